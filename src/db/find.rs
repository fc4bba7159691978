use std::collections::HashSet;

use tracing::trace;

use crate::error::Result;
use crate::model::NodeId;
use crate::query::input::{NodeQuery, Selector};
use crate::view::NodeModel;

use super::repo::GraphRepo;

impl GraphRepo {
    /// Resolves a selector — id, id list, query, or query list — to node
    /// models. Id lookups preserve order and fail on the first missing id;
    /// a query scans its kind in insertion order; a query list concatenates
    /// branch results (duplicates kept unless configured otherwise).
    pub fn find(&self, selector: impl Into<Selector>) -> Result<Vec<NodeModel<'_>>> {
        let ids = self.resolve(&selector.into())?;
        ids.iter().map(|id| self.get_model(id)).collect()
    }

    pub(crate) fn resolve(&self, selector: &Selector) -> Result<Vec<NodeId>> {
        match selector {
            Selector::Id(id) => {
                self.get_node(id)?;
                Ok(vec![id.clone()])
            }
            Selector::Ids(ids) => ids
                .iter()
                .map(|id| self.get_node(id).map(|node| node.id.clone()))
                .collect(),
            Selector::Query(query) => self.find_by_query(query),
            Selector::Queries(queries) => {
                let mut matched = Vec::new();
                for query in queries {
                    matched.extend(self.find_by_query(query)?);
                }
                if self.config.dedupe_disjunction {
                    let mut seen = HashSet::new();
                    matched.retain(|id| seen.insert(id.clone()));
                }
                Ok(matched)
            }
        }
    }

    fn find_by_query(&self, query: &NodeQuery) -> Result<Vec<NodeId>> {
        let mut matched = Vec::new();
        for node in self.nodes.iter_kind(&query.kind) {
            if self.matches(node, query)? {
                matched.push(node.id.clone());
            }
        }
        trace!(kind = %query.kind, count = matched.len(), "query evaluated");
        Ok(matched)
    }
}
