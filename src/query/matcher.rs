//! Node-query evaluation against the live store.
//!
//! Query entries are partitioned by the schema: keys naming a relation of
//! the node's kind descend through traversal (sub-query lists with
//! exists-semantics, or operators over the related list as a whole);
//! everything else is a value predicate. A node matches when every entry
//! matches.

use tracing::trace;

use crate::db::GraphRepo;
use crate::error::{GraphError, Result};
use crate::model::{Node, Value};

use super::input::{FieldQuery, NodeQuery, SubQuery, ValueQuery};
use super::operator::{match_length, match_value, scalar_arg, single_entry};

impl GraphRepo {
    /// The query's `kind` tag is matched by the find dispatcher; only the
    /// field entries are evaluated here.
    pub(crate) fn matches(&self, node: &Node, query: &NodeQuery) -> Result<bool> {
        self.matches_fields(node, &query.fields)
    }

    pub(crate) fn matches_fields(&self, node: &Node, fields: &SubQuery) -> Result<bool> {
        for (name, field) in fields.iter() {
            let matched = if self.schema.is_relation(&node.kind, name) {
                self.matches_relation(node, name, field)?
            } else {
                self.matches_value(node, name, field)?
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn matches_value(&self, node: &Node, name: &str, field: &FieldQuery) -> Result<bool> {
        let FieldQuery::Value(query) = field else {
            return Err(GraphError::validation(
                name,
                "value predicate",
                "relation sub-queries",
            ));
        };
        // `id` and `kind` are queryable alongside the stored fields.
        match name {
            "id" => match_value(Some(&Value::String(node.id.clone())), query),
            "kind" => match_value(Some(&Value::String(node.kind.clone())), query),
            _ => match_value(node.field(name), query),
        }
    }

    fn matches_relation(&self, node: &Node, name: &str, field: &FieldQuery) -> Result<bool> {
        let related = self.related(node, name);
        match field {
            FieldQuery::Related(subs) => {
                for candidate in &related {
                    for sub in subs {
                        if self.matches_fields(candidate, sub)? {
                            trace!(node = %node.id, relation = name, "relation sub-query matched");
                            return Ok(true);
                        }
                    }
                }
                Ok(false)
            }
            FieldQuery::Value(ValueQuery::Where(ops)) => {
                let (key, arg) = single_entry(ops)?;
                match key {
                    "length" => match_length(related.len(), arg),
                    "empty" => Ok(related.is_empty() && scalar_arg(key, arg)?.truthy()),
                    "includes" => match scalar_arg(key, arg)? {
                        Value::String(id) => Ok(related.iter().any(|node| node.id == *id)),
                        other => Err(GraphError::validation(
                            key,
                            "related node id",
                            format!("{other:?}"),
                        )),
                    },
                    "eq" | "ne" | "lt" | "lte" | "gt" | "gte" | "re" => {
                        Err(GraphError::validation(
                            name,
                            "relation operator (length, empty, includes)",
                            key,
                        ))
                    }
                    other => Err(GraphError::UnsupportedOperator(other.to_owned())),
                }
            }
            FieldQuery::Value(_) => Err(GraphError::validation(
                name,
                "sub-queries or an operator object",
                "scalar predicate",
            )),
        }
    }
}
