use tracing::trace;

use crate::error::Result;
use crate::model::Node;
use crate::schema::Direction;

use super::repo::GraphRepo;

impl GraphRepo {
    /// Related nodes for a named relation, in edge insertion order.
    /// Unknown relation names resolve to the empty list.
    pub(crate) fn related<'g>(&'g self, node: &Node, name: &str) -> Vec<&'g Node> {
        let Some(rel) = self.schema.relation(&node.kind, name) else {
            return Vec::new();
        };

        let mut related = Vec::new();
        for edge in self.edges.iter() {
            if let Some(edge_kind) = &rel.edge_kind {
                if edge.kind != *edge_kind {
                    continue;
                }
            }
            let other = match rel.direction {
                Direction::To if edge.from == node.id => &edge.to,
                Direction::From if edge.to == node.id => &edge.from,
                _ => continue,
            };
            if let Some(other) = self.nodes.get(other) {
                if other.kind == rel.related_kind {
                    related.push(other);
                }
            }
        }
        trace!(
            node = %node.id,
            relation = name,
            count = related.len(),
            "resolved relation"
        );
        related
    }

    /// Plain related-node records for callers outside the view layer.
    pub fn get_related_nodes(&self, id: &str, name: &str) -> Result<Vec<Node>> {
        let node = self.get_node(id)?;
        Ok(self.related(node, name).into_iter().cloned().collect())
    }
}
