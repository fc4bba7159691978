use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::{Node, NodeId};
use crate::schema::{GraphSnapshot, Schema};
use crate::view::NodeModel;

use super::config::RepoConfig;
use super::metrics::RepoMetrics;
use super::store::{EdgeStore, NodeStore};

/// In-memory schema-driven graph repository.
///
/// Owns the node and edge stores and the id counter; the schema is
/// read-only after construction. Write paths take `&mut self`, read paths
/// `&self`, so one caller at a time is enforced by the borrow checker.
pub struct GraphRepo {
    pub(crate) schema: Schema,
    pub(crate) nodes: NodeStore,
    pub(crate) edges: EdgeStore,
    pub(crate) next_id: u64,
    pub(crate) config: RepoConfig,
    pub metrics: RepoMetrics,
}

impl std::fmt::Debug for GraphRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphRepo")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("next_id", &self.next_id)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for GraphRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRepo {
    /// Empty repository with no relations declared.
    pub fn new() -> Self {
        Self {
            schema: Schema::default(),
            nodes: NodeStore::default(),
            edges: EdgeStore::default(),
            next_id: 1,
            config: RepoConfig::default(),
            metrics: RepoMetrics::default(),
        }
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        Self::from_snapshot_with_config(snapshot, RepoConfig::default())
    }

    pub fn from_snapshot_with_config(snapshot: GraphSnapshot, config: RepoConfig) -> Result<Self> {
        let mut repo = Self {
            schema: Schema::parse(&snapshot.relations)?,
            config,
            ..Self::new()
        };
        repo.load(snapshot)?;
        Ok(repo)
    }

    fn load(&mut self, snapshot: GraphSnapshot) -> Result<()> {
        for node in snapshot.nodes {
            if self.nodes.contains(&node.id) {
                return Err(GraphError::validation(
                    format!("nodes.{}", node.id),
                    "unique node id",
                    "duplicate",
                ));
            }
            // Generated ids are stringified integers; start past any
            // numeric snapshot id so they never collide.
            if let Ok(numeric) = node.id.parse::<u64>() {
                if numeric >= self.next_id {
                    self.next_id = numeric + 1;
                }
            }
            self.nodes.insert(node);
        }
        for edge in snapshot.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !self.nodes.contains(endpoint) {
                    return Err(GraphError::validation(
                        format!("edges.{}", edge.key()),
                        "existing node id",
                        endpoint.clone(),
                    ));
                }
            }
            self.edges.insert(edge);
        }
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "loaded snapshot"
        );
        Ok(())
    }

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        let id = self.next_id.to_string();
        self.next_id += 1;
        id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn get_node(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::not_found("node", id))
    }

    /// Lazy view over a stored node; relations resolve against the live
    /// edge store on every access.
    pub fn get_model(&self, id: &str) -> Result<NodeModel<'_>> {
        Ok(NodeModel::new(self, self.get_node(id)?))
    }
}
