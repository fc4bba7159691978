use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::Value;
use crate::query::input::{NodeQuery, Patch, PatchField, RelationPatch, Selector};
use crate::schema::Relation;
use crate::view::NodeModel;

use super::repo::GraphRepo;

impl GraphRepo {
    /// Applies a patch to every node the selector resolves to: value
    /// fields shallow-merge over the record (`id`/`kind` are ignored),
    /// relation entries add or remove edges by resolving their sub-queries
    /// against the store.
    pub fn update(
        &mut self,
        selector: impl Into<Selector>,
        patch: &Patch,
    ) -> Result<Vec<NodeModel<'_>>> {
        let ids = self.resolve(&selector.into())?;
        for id in &ids {
            self.apply_patch(id, patch)?;
            self.metrics.patches_applied += 1;
        }
        ids.iter().map(|id| self.get_model(id)).collect()
    }

    fn apply_patch(&mut self, id: &str, patch: &Patch) -> Result<()> {
        let kind = self.get_node(id)?.kind.clone();

        let mut values: Vec<(String, Value)> = Vec::new();
        let mut relations: Vec<(Relation, &RelationPatch)> = Vec::new();
        for (name, field) in &patch.fields {
            match (self.schema.relation(&kind, name), field) {
                (Some(rel), PatchField::Relation(directives)) => {
                    relations.push((rel.clone(), directives));
                }
                (Some(_), PatchField::Value(value)) => {
                    return Err(GraphError::validation(
                        name.clone(),
                        "add/remove directives",
                        format!("{value:?}"),
                    ));
                }
                (None, PatchField::Value(value)) => {
                    if name != "id" && name != "kind" {
                        values.push((name.clone(), value.clone()));
                    }
                }
                (None, PatchField::Relation(_)) => {
                    return Err(GraphError::validation(
                        name.clone(),
                        "relation declared for the node kind",
                        kind.clone(),
                    ));
                }
            }
        }

        if !values.is_empty() {
            let node = self
                .nodes
                .get_mut(id)
                .ok_or_else(|| GraphError::not_found("node", id))?;
            for (name, value) in values {
                node.fields.insert(name, value);
            }
        }

        for (rel, directives) in relations {
            for sub in &directives.add {
                let query = NodeQuery::from_parts(rel.related_kind.clone(), sub.clone());
                for target in self.resolve(&Selector::Query(query))? {
                    self.link(id, &target, &rel);
                }
            }
            for sub in &directives.remove {
                let query = NodeQuery::from_parts(rel.related_kind.clone(), sub.clone());
                for target in self.resolve(&Selector::Query(query))? {
                    self.unlink(id, &target, &rel);
                }
            }
        }

        debug!(id = %id, "applied patch");
        Ok(())
    }
}
