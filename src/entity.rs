//! Flat entity repository.
//!
//! A plain id-to-record map with no schema and no relations, sharing the
//! value-operator vocabulary of [`crate::query::operator`]. It exists next
//! to the graph repository for data that has no graph shape; the graph
//! engine does not depend on it.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::Value;
use crate::query::input::ValueQuery;
use crate::query::operator::match_value;

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: String,
    pub fields: BTreeMap<String, Value>,
}

/// Field values for a create or update call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityInput {
    fields: BTreeMap<String, Value>,
}

impl EntityInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Conjunction of value predicates over entity fields (`id` included).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityQuery {
    fields: BTreeMap<String, ValueQuery>,
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, query: impl Into<ValueQuery>) -> Self {
        self.fields.insert(name.into(), query.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntitySelector {
    Id(String),
    Ids(Vec<String>),
    Query(EntityQuery),
    Queries(Vec<EntityQuery>),
}

impl From<&str> for EntitySelector {
    fn from(id: &str) -> Self {
        EntitySelector::Id(id.to_owned())
    }
}

impl From<String> for EntitySelector {
    fn from(id: String) -> Self {
        EntitySelector::Id(id)
    }
}

impl From<Vec<String>> for EntitySelector {
    fn from(ids: Vec<String>) -> Self {
        EntitySelector::Ids(ids)
    }
}

impl From<Vec<&str>> for EntitySelector {
    fn from(ids: Vec<&str>) -> Self {
        EntitySelector::Ids(ids.into_iter().map(str::to_owned).collect())
    }
}

impl From<EntityQuery> for EntitySelector {
    fn from(query: EntityQuery) -> Self {
        EntitySelector::Query(query)
    }
}

impl From<Vec<EntityQuery>> for EntitySelector {
    fn from(queries: Vec<EntityQuery>) -> Self {
        EntitySelector::Queries(queries)
    }
}

#[derive(Debug)]
pub struct EntityRepo {
    records: HashMap<String, Entity>,
    order: Vec<String>,
    next_id: u64,
}

impl Default for EntityRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRepo {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn create(&mut self, input: EntityInput) -> Result<&Entity> {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.insert(id, input)
    }

    /// Insert under a caller-chosen id; duplicate ids are rejected.
    pub fn create_with_id(&mut self, id: impl Into<String>, input: EntityInput) -> Result<&Entity> {
        let id = id.into();
        if self.records.contains_key(&id) {
            return Err(GraphError::AlreadyExists(id));
        }
        if let Ok(numeric) = id.parse::<u64>() {
            if numeric >= self.next_id {
                self.next_id = numeric + 1;
            }
        }
        self.insert(id, input)
    }

    fn insert(&mut self, id: String, input: EntityInput) -> Result<&Entity> {
        let entity = Entity {
            id: id.clone(),
            fields: input.fields,
        };
        self.records.insert(id.clone(), entity);
        self.order.push(id.clone());
        debug!(id = %id, "created entity");
        Ok(&self.records[&id])
    }

    pub fn find(&self, selector: impl Into<EntitySelector>) -> Result<Vec<&Entity>> {
        let ids = self.resolve(&selector.into())?;
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect())
    }

    /// Shallow merge of the input fields over each matched record; `id` is
    /// immutable and skipped.
    pub fn update(
        &mut self,
        selector: impl Into<EntitySelector>,
        patch: &EntityInput,
    ) -> Result<Vec<&Entity>> {
        let ids = self.resolve(&selector.into())?;
        for id in &ids {
            if let Some(entity) = self.records.get_mut(id) {
                for (name, value) in &patch.fields {
                    if name != "id" {
                        entity.fields.insert(name.clone(), value.clone());
                    }
                }
            }
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect())
    }

    pub fn delete(&mut self, selector: impl Into<EntitySelector>) -> Result<Vec<Entity>> {
        let ids = self.resolve(&selector.into())?;
        let mut removed = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(entity) = self.records.remove(id) {
                self.order.retain(|entry| entry != id);
                removed.push(entity);
            }
        }
        Ok(removed)
    }

    fn resolve(&self, selector: &EntitySelector) -> Result<Vec<String>> {
        match selector {
            EntitySelector::Id(id) => {
                self.require(id)?;
                Ok(vec![id.clone()])
            }
            EntitySelector::Ids(ids) => {
                for id in ids {
                    self.require(id)?;
                }
                Ok(ids.clone())
            }
            EntitySelector::Query(query) => self.find_by_query(query),
            EntitySelector::Queries(queries) => {
                let mut matched = Vec::new();
                for query in queries {
                    matched.extend(self.find_by_query(query)?);
                }
                Ok(matched)
            }
        }
    }

    fn require(&self, id: &str) -> Result<&Entity> {
        self.records
            .get(id)
            .ok_or_else(|| GraphError::not_found("entity", id))
    }

    fn find_by_query(&self, query: &EntityQuery) -> Result<Vec<String>> {
        let mut matched = Vec::new();
        for id in &self.order {
            let Some(entity) = self.records.get(id) else {
                continue;
            };
            if Self::matches(entity, query)? {
                matched.push(id.clone());
            }
        }
        Ok(matched)
    }

    fn matches(entity: &Entity, query: &EntityQuery) -> Result<bool> {
        for (name, value_query) in &query.fields {
            let matched = if name == "id" {
                match_value(Some(&Value::String(entity.id.clone())), value_query)?
            } else {
                match_value(entity.fields.get(name), value_query)?
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
