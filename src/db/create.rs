use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::{Edge, Node, NodeId};
use crate::query::input::{CreateInput, InputField, NodeInput};
use crate::schema::{Direction, Relation};
use crate::view::NodeModel;

use super::repo::GraphRepo;

impl GraphRepo {
    /// Materialises a create tree: the root node, nested related nodes,
    /// and the edges linking them. Children are created before their
    /// parent's edges to them; nothing is rolled back on failure.
    pub fn create(&mut self, input: CreateInput) -> Result<NodeModel<'_>> {
        let id = self.create_node(&input.kind, &input.fields, 0)?;
        self.get_model(&id)
    }

    /// Element-wise create over an input list, in input order.
    pub fn create_many(&mut self, inputs: Vec<CreateInput>) -> Result<Vec<NodeModel<'_>>> {
        let mut ids = Vec::with_capacity(inputs.len());
        for input in &inputs {
            ids.push(self.create_node(&input.kind, &input.fields, 0)?);
        }
        ids.iter().map(|id| self.get_model(id)).collect()
    }

    fn create_node(
        &mut self,
        kind: &str,
        fields: &BTreeMap<String, InputField>,
        depth: usize,
    ) -> Result<NodeId> {
        if depth > self.config.max_create_depth {
            return Err(GraphError::validation(
                "create input",
                "nesting within the configured depth",
                format!("depth {depth}"),
            ));
        }

        let id = self.allocate_id();
        let mut node = Node::new(id.clone(), kind);
        let mut relations: Vec<(String, Relation, &[NodeInput])> = Vec::new();

        for (name, field) in fields {
            match (self.schema.relation(kind, name), field) {
                (Some(rel), InputField::Related(inputs)) => {
                    relations.push((name.clone(), rel.clone(), inputs.as_slice()));
                }
                (Some(_), InputField::Value(value)) => {
                    return Err(GraphError::validation(
                        name.clone(),
                        "related node inputs",
                        format!("{value:?}"),
                    ));
                }
                (None, InputField::Value(value)) => {
                    // `id` and `kind` are engine-owned.
                    if name != "id" && name != "kind" {
                        node.fields.insert(name.clone(), value.clone());
                    }
                }
                (None, InputField::Related(_)) => {
                    return Err(GraphError::validation(
                        name.clone(),
                        "relation declared for the node kind",
                        kind.to_owned(),
                    ));
                }
            }
        }

        self.nodes.insert(node);
        self.metrics.nodes_created += 1;
        debug!(id = %id, kind, "created node");

        for (name, rel, inputs) in relations {
            for input in inputs {
                let related_id = match input {
                    NodeInput::Ref(ref_id) => {
                        let referenced = self.nodes.get(ref_id).ok_or_else(|| {
                            GraphError::validation(
                                name.clone(),
                                "existing node id",
                                ref_id.clone(),
                            )
                        })?;
                        if referenced.kind != rel.related_kind {
                            return Err(GraphError::validation(
                                name.clone(),
                                "node of the relation's kind",
                                referenced.kind.clone(),
                            ));
                        }
                        ref_id.clone()
                    }
                    NodeInput::Nested(nested) => {
                        self.create_node(&rel.related_kind, &nested.fields, depth + 1)?
                    }
                };
                self.link(&id, &related_id, &rel);
            }
        }

        Ok(id)
    }

    /// Inserts the edge realising `rel` between a node and a related node,
    /// endpoints ordered by the relation's direction. Idempotent.
    pub(crate) fn link(&mut self, node_id: &str, related_id: &str, rel: &Relation) -> bool {
        let kind = rel.edge_kind.clone().unwrap_or_default();
        let edge = match rel.direction {
            Direction::To => Edge::new(node_id, related_id, kind),
            Direction::From => Edge::new(related_id, node_id, kind),
        };
        let inserted = self.edges.insert(edge);
        if inserted {
            self.metrics.edges_created += 1;
        }
        inserted
    }

    /// Removes the edge realising `rel` between a node and a related node,
    /// by canonical key.
    pub(crate) fn unlink(&mut self, node_id: &str, related_id: &str, rel: &Relation) -> bool {
        let kind = rel.edge_kind.as_deref().unwrap_or_default();
        let key = match rel.direction {
            Direction::To => Edge::key_of(node_id, kind, related_id),
            Direction::From => Edge::key_of(related_id, kind, node_id),
        };
        let removed = self.edges.remove(&key).is_some();
        if removed {
            self.metrics.edges_deleted += 1;
        }
        removed
    }
}
