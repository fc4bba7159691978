use tracing::debug;

use crate::error::Result;
use crate::model::{EdgeId, Node};
use crate::query::input::Selector;

use super::repo::GraphRepo;

impl GraphRepo {
    /// Removes every node the selector resolves to along with all incident
    /// edges. Returns the removed records as plain nodes; their relations
    /// are no longer traversable.
    pub fn delete(&mut self, selector: impl Into<Selector>) -> Result<Vec<Node>> {
        let ids = self.resolve(&selector.into())?;
        let mut removed = Vec::with_capacity(ids.len());
        for id in &ids {
            let incident: Vec<EdgeId> = self
                .edges
                .iter()
                .filter(|edge| edge.touches(id))
                .map(|edge| edge.key())
                .collect();
            for key in incident {
                if self.edges.remove(&key).is_some() {
                    self.metrics.edges_deleted += 1;
                }
            }
            // A disjunctive selector can name the same node twice; the
            // second removal is a no-op.
            if let Some(node) = self.nodes.remove(id) {
                self.metrics.nodes_deleted += 1;
                debug!(id = %id, "deleted node");
                removed.push(node);
            }
        }
        Ok(removed)
    }
}
