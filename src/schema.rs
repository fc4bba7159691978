//! Schema snapshot types and the parsed relation registry.
//!
//! A snapshot declares, per node kind, a map of relation names to raw
//! [`RelationSpec`] entries carrying exactly one of `from`/`to`. The
//! repository parses those once at construction into [`Relation`] values
//! whose direction is explicit; everything downstream (traversal, the query
//! matcher, the create and update engines) consults the parsed form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::model::{Edge, Node};

/// Raw relation entry as written in a snapshot.
///
/// Exactly one of `from`/`to` names the related node kind; which one is
/// present selects the traversal direction seen from the owning kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_kind: Option<String>,
}

impl RelationSpec {
    /// Relation whose edges leave the owning node toward `kind`.
    pub fn outbound(kind: impl Into<String>) -> Self {
        Self {
            to: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Relation whose edges arrive at the owning node from `kind`.
    pub fn inbound(kind: impl Into<String>) -> Self {
        Self {
            from: Some(kind.into()),
            ..Self::default()
        }
    }

    pub fn with_edge_kind(mut self, kind: impl Into<String>) -> Self {
        self.edge_kind = Some(kind.into());
        self
    }

    pub fn parse(&self, path: &str) -> Result<Relation> {
        match (&self.from, &self.to) {
            (Some(kind), None) => Ok(Relation {
                direction: Direction::From,
                related_kind: kind.clone(),
                edge_kind: self.edge_kind.clone(),
            }),
            (None, Some(kind)) => Ok(Relation {
                direction: Direction::To,
                related_kind: kind.clone(),
                edge_kind: self.edge_kind.clone(),
            }),
            (Some(_), Some(_)) => Err(GraphError::validation(
                path,
                "exactly one of 'from'/'to'",
                "both",
            )),
            (None, None) => Err(GraphError::validation(
                path,
                "exactly one of 'from'/'to'",
                "neither",
            )),
        }
    }
}

/// Traversal direction seen from the owning node kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// The owning node is reached by inbound edges from the related kind.
    From,
    /// The owning node's edges go outbound to the related kind.
    To,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub direction: Direction,
    pub related_kind: String,
    pub edge_kind: Option<String>,
}

/// Initial repository state: seed nodes and edges plus the relation schema.
/// This is the sole serialized form the repository accepts; it is consumed
/// at construction and never emitted back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub relations: BTreeMap<String, BTreeMap<String, RelationSpec>>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn relation(
        mut self,
        kind: impl Into<String>,
        name: impl Into<String>,
        spec: RelationSpec,
    ) -> Self {
        self.relations
            .entry(kind.into())
            .or_default()
            .insert(name.into(), spec);
        self
    }
}

/// Read-only registry of parsed relations, keyed by node kind then name.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    relations: BTreeMap<String, BTreeMap<String, Relation>>,
}

impl Schema {
    pub fn parse(raw: &BTreeMap<String, BTreeMap<String, RelationSpec>>) -> Result<Self> {
        let mut relations: BTreeMap<String, BTreeMap<String, Relation>> = BTreeMap::new();
        for (kind, entries) in raw {
            let mut parsed = BTreeMap::new();
            for (name, spec) in entries {
                let path = format!("relations.{kind}.{name}");
                parsed.insert(name.clone(), spec.parse(&path)?);
            }
            relations.insert(kind.clone(), parsed);
        }
        Ok(Self { relations })
    }

    /// Relations declared for `kind`; empty when it has none.
    pub fn relations_for(&self, kind: &str) -> &BTreeMap<String, Relation> {
        static EMPTY: BTreeMap<String, Relation> = BTreeMap::new();
        self.relations.get(kind).unwrap_or(&EMPTY)
    }

    pub fn relation(&self, kind: &str, name: &str) -> Option<&Relation> {
        self.relations.get(kind).and_then(|rels| rels.get(name))
    }

    pub fn is_relation(&self, kind: &str, name: &str) -> bool {
        self.relation(kind, name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_selects_direction_from_the_present_key() {
        let rel = RelationSpec::outbound("document").parse("relations.author.documents");
        let rel = rel.expect("outbound spec parses");
        assert_eq!(rel.direction, Direction::To);
        assert_eq!(rel.related_kind, "document");
        assert_eq!(rel.edge_kind, None);

        let rel = RelationSpec::inbound("user")
            .with_edge_kind("is")
            .parse("relations.author.users")
            .expect("inbound spec parses");
        assert_eq!(rel.direction, Direction::From);
        assert_eq!(rel.related_kind, "user");
        assert_eq!(rel.edge_kind.as_deref(), Some("is"));
    }

    #[test]
    fn parse_rejects_zero_or_two_directions() {
        let err = RelationSpec::default().parse("relations.user.authors");
        assert!(matches!(err, Err(GraphError::Validation { .. })));

        let both = RelationSpec {
            from: Some("a".into()),
            to: Some("b".into()),
            edge_kind: None,
        };
        let err = both.parse("relations.user.authors");
        assert!(matches!(err, Err(GraphError::Validation { .. })));
    }

    #[test]
    fn registry_is_empty_for_unknown_kinds() {
        let schema = Schema::default();
        assert!(schema.relations_for("user").is_empty());
        assert!(schema.relation("user", "authors").is_none());
    }
}
