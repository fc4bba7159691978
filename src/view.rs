//! Lazy node-model views.
//!
//! A [`NodeModel`] wraps a stored node and exposes, next to its value
//! fields, one attribute per relation declared for the node's kind. The
//! related list is recomputed against the edge store on every access, so a
//! view never observes stale links; cyclic schemas are safe because child
//! models are only materialised when their relation is read. Models borrow
//! the repository, so the borrow checker rules out reads concurrent with
//! mutation — and with it, any write surface on the view itself.

use std::collections::BTreeSet;

use crate::db::GraphRepo;
use crate::model::{Node, Value};

#[derive(Clone, Copy)]
pub struct NodeModel<'g> {
    repo: &'g GraphRepo,
    node: &'g Node,
}

/// A resolved attribute: a stored value, a related-model list, or nothing.
#[derive(Debug)]
pub enum Attr<'g> {
    Value(&'g Value),
    Related(Vec<NodeModel<'g>>),
    Absent,
}

impl<'g> NodeModel<'g> {
    pub(crate) fn new(repo: &'g GraphRepo, node: &'g Node) -> Self {
        Self { repo, node }
    }

    pub fn id(&self) -> &'g str {
        &self.node.id
    }

    pub fn kind(&self) -> &'g str {
        &self.node.kind
    }

    /// The underlying record.
    pub fn node(&self) -> &'g Node {
        self.node
    }

    pub fn to_node(&self) -> Node {
        self.node.clone()
    }

    /// A stored value field; `None` for relation names and unknown names.
    pub fn value(&self, name: &str) -> Option<&'g Value> {
        self.node.fields.get(name)
    }

    /// Related models for a declared relation, resolved now. Undeclared
    /// names resolve to the empty list; use [`NodeModel::attr`] to
    /// distinguish them.
    pub fn related(&self, name: &str) -> Vec<NodeModel<'g>> {
        self.repo
            .related(self.node, name)
            .into_iter()
            .map(|node| NodeModel::new(self.repo, node))
            .collect()
    }

    /// Resolves a name against the view's property set: relations first
    /// (the schema partition wins over a same-named stored field), then
    /// value fields, then [`Attr::Absent`].
    pub fn attr(&self, name: &str) -> Attr<'g> {
        if self.repo.schema().is_relation(&self.node.kind, name) {
            Attr::Related(self.related(name))
        } else if let Some(value) = self.node.fields.get(name) {
            Attr::Value(value)
        } else {
            Attr::Absent
        }
    }

    /// The advertised property set: value fields plus declared relation
    /// names.
    pub fn field_names(&self) -> Vec<&'g str> {
        let mut names: BTreeSet<&str> = self.node.fields.keys().map(String::as_str).collect();
        names.extend(
            self.repo
                .schema()
                .relations_for(&self.node.kind)
                .keys()
                .map(String::as_str),
        );
        names.into_iter().collect()
    }
}

impl std::fmt::Debug for NodeModel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Relations are left unresolved: rendering them would chase cycles.
        f.debug_struct("NodeModel")
            .field("id", &self.node.id)
            .field("kind", &self.node.kind)
            .field("fields", &self.node.fields)
            .finish()
    }
}
