//! Programmatic input model for queries, create trees, and patches.
//!
//! These types are built fluently at call sites rather than parsed from a
//! wire format; the repository partitions their entries into value fields
//! and relation fields against the schema at execution time, so the same
//! key space covers both.

use std::collections::BTreeMap;

use crate::model::{NodeId, Value};

/// Predicate over a single value field.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueQuery {
    /// Equality against a scalar (numeric comparisons coerce Int/Float).
    Eq(Value),
    /// Membership among the listed values.
    AnyOf(Vec<Value>),
    /// Operator object, e.g. `{ gt: 3 }` or `{ length: { gt: 1 } }`.
    Where(OperatorMap),
}

impl From<Value> for ValueQuery {
    fn from(value: Value) -> Self {
        ValueQuery::Eq(value)
    }
}

impl From<&str> for ValueQuery {
    fn from(value: &str) -> Self {
        ValueQuery::Eq(value.into())
    }
}

impl From<String> for ValueQuery {
    fn from(value: String) -> Self {
        ValueQuery::Eq(value.into())
    }
}

impl From<bool> for ValueQuery {
    fn from(value: bool) -> Self {
        ValueQuery::Eq(value.into())
    }
}

impl From<i32> for ValueQuery {
    fn from(value: i32) -> Self {
        ValueQuery::Eq(value.into())
    }
}

impl From<i64> for ValueQuery {
    fn from(value: i64) -> Self {
        ValueQuery::Eq(value.into())
    }
}

impl From<f64> for ValueQuery {
    fn from(value: f64) -> Self {
        ValueQuery::Eq(value.into())
    }
}

impl From<Vec<Value>> for ValueQuery {
    fn from(values: Vec<Value>) -> Self {
        ValueQuery::AnyOf(values)
    }
}

impl From<OperatorMap> for ValueQuery {
    fn from(ops: OperatorMap) -> Self {
        ValueQuery::Where(ops)
    }
}

/// An operator object: ordered `(key, argument)` entries.
///
/// A well-formed object carries exactly one entry; the constructors below
/// all build that shape. Malformed objects are representable on purpose
/// ([`OperatorMap::from_entries`]) and are rejected at evaluation time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperatorMap {
    entries: Vec<(String, OperatorArg)>,
}

impl OperatorMap {
    pub fn single(key: impl Into<String>, arg: impl Into<OperatorArg>) -> Self {
        Self {
            entries: vec![(key.into(), arg.into())],
        }
    }

    pub fn from_entries(entries: Vec<(String, OperatorArg)>) -> Self {
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &[(String, OperatorArg)] {
        &self.entries
    }

    pub fn eq(arg: impl Into<OperatorArg>) -> Self {
        Self::single("eq", arg)
    }

    pub fn ne(arg: impl Into<OperatorArg>) -> Self {
        Self::single("ne", arg)
    }

    pub fn lt(arg: impl Into<OperatorArg>) -> Self {
        Self::single("lt", arg)
    }

    pub fn lte(arg: impl Into<OperatorArg>) -> Self {
        Self::single("lte", arg)
    }

    pub fn gt(arg: impl Into<OperatorArg>) -> Self {
        Self::single("gt", arg)
    }

    pub fn gte(arg: impl Into<OperatorArg>) -> Self {
        Self::single("gte", arg)
    }

    /// Regular-expression match; the argument is the pattern source.
    pub fn re(pattern: impl Into<String>) -> Self {
        Self::single("re", Value::String(pattern.into()))
    }

    /// Matches iff the value has length zero *and* the argument is truthy,
    /// so `empty(false)` never matches. Use `length(OperatorMap::gt(0))`
    /// for "must not be empty".
    pub fn empty(arg: bool) -> Self {
        Self::single("empty", Value::Bool(arg))
    }

    /// Applies the argument (a number for equality, or a nested operator
    /// object) to the value's length.
    pub fn length(arg: impl Into<OperatorArg>) -> Self {
        Self::single("length", arg)
    }

    pub fn includes(arg: impl Into<OperatorArg>) -> Self {
        Self::single("includes", arg)
    }
}

/// Argument carried by an operator entry.
#[derive(Clone, Debug, PartialEq)]
pub enum OperatorArg {
    Value(Value),
    Nested(OperatorMap),
}

impl From<Value> for OperatorArg {
    fn from(value: Value) -> Self {
        OperatorArg::Value(value)
    }
}

impl From<&str> for OperatorArg {
    fn from(value: &str) -> Self {
        OperatorArg::Value(value.into())
    }
}

impl From<String> for OperatorArg {
    fn from(value: String) -> Self {
        OperatorArg::Value(value.into())
    }
}

impl From<bool> for OperatorArg {
    fn from(value: bool) -> Self {
        OperatorArg::Value(value.into())
    }
}

impl From<i32> for OperatorArg {
    fn from(value: i32) -> Self {
        OperatorArg::Value(value.into())
    }
}

impl From<i64> for OperatorArg {
    fn from(value: i64) -> Self {
        OperatorArg::Value(value.into())
    }
}

impl From<f64> for OperatorArg {
    fn from(value: f64) -> Self {
        OperatorArg::Value(value.into())
    }
}

impl From<OperatorMap> for OperatorArg {
    fn from(ops: OperatorMap) -> Self {
        OperatorArg::Nested(ops)
    }
}

/// One query entry; whether it is a value predicate or a relation
/// sub-query is decided against the schema, not by the shape alone.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldQuery {
    Value(ValueQuery),
    /// Relation sub-queries: matches when some related node satisfies some
    /// sub-query. The related kind is implied by the relation.
    Related(Vec<SubQuery>),
}

/// Kind-less query fields, used for relation sub-queries and for the
/// add/remove directives of a relation patch (the kind is injected from
/// the relation being traversed).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubQuery {
    fields: BTreeMap<String, FieldQuery>,
}

impl SubQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, query: impl Into<ValueQuery>) -> Self {
        self.fields
            .insert(name.into(), FieldQuery::Value(query.into()));
        self
    }

    pub fn related(
        mut self,
        name: impl Into<String>,
        subs: impl IntoIterator<Item = SubQuery>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FieldQuery::Related(subs.into_iter().collect()),
        );
        self
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &FieldQuery)> {
        self.fields.iter()
    }
}

/// A root query: a kind tag plus field predicates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeQuery {
    pub kind: String,
    pub fields: SubQuery,
}

impl NodeQuery {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: SubQuery::new(),
        }
    }

    pub fn from_parts(kind: impl Into<String>, fields: SubQuery) -> Self {
        Self {
            kind: kind.into(),
            fields,
        }
    }

    pub fn field(mut self, name: impl Into<String>, query: impl Into<ValueQuery>) -> Self {
        self.fields = self.fields.field(name, query);
        self
    }

    pub fn related(
        mut self,
        name: impl Into<String>,
        subs: impl IntoIterator<Item = SubQuery>,
    ) -> Self {
        self.fields = self.fields.related(name, subs);
        self
    }
}

/// Polymorphic first argument to `find`/`update`/`delete`.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
    Id(NodeId),
    Ids(Vec<NodeId>),
    Query(NodeQuery),
    Queries(Vec<NodeQuery>),
}

impl From<&str> for Selector {
    fn from(id: &str) -> Self {
        Selector::Id(id.to_owned())
    }
}

impl From<String> for Selector {
    fn from(id: String) -> Self {
        Selector::Id(id)
    }
}

impl From<Vec<String>> for Selector {
    fn from(ids: Vec<String>) -> Self {
        Selector::Ids(ids)
    }
}

impl From<Vec<&str>> for Selector {
    fn from(ids: Vec<&str>) -> Self {
        Selector::Ids(ids.into_iter().map(str::to_owned).collect())
    }
}

impl From<NodeQuery> for Selector {
    fn from(query: NodeQuery) -> Self {
        Selector::Query(query)
    }
}

impl From<Vec<NodeQuery>> for Selector {
    fn from(queries: Vec<NodeQuery>) -> Self {
        Selector::Queries(queries)
    }
}

/// One create-input entry, partitioned against the schema like
/// [`FieldQuery`].
#[derive(Clone, Debug, PartialEq)]
pub enum InputField {
    Value(Value),
    Related(Vec<NodeInput>),
}

/// Element of a relation entry in a create input: link an existing node or
/// create a fresh one of the relation's kind.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeInput {
    Ref(NodeId),
    Nested(NestedInput),
}

impl NodeInput {
    pub fn reference(id: impl Into<NodeId>) -> Self {
        NodeInput::Ref(id.into())
    }

    pub fn nested(input: NestedInput) -> Self {
        NodeInput::Nested(input)
    }
}

impl From<NestedInput> for NodeInput {
    fn from(input: NestedInput) -> Self {
        NodeInput::Nested(input)
    }
}

/// Kind-less create input nested under a relation entry; the kind is
/// injected from the relation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NestedInput {
    pub(crate) fields: BTreeMap<String, InputField>,
}

impl NestedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), InputField::Value(value.into()));
        self
    }

    pub fn related(
        mut self,
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = NodeInput>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            InputField::Related(inputs.into_iter().collect()),
        );
        self
    }
}

/// Root create input: a kind plus value fields and relation entries.
#[derive(Clone, Debug, PartialEq)]
pub struct CreateInput {
    pub kind: String,
    pub(crate) fields: BTreeMap<String, InputField>,
}

impl CreateInput {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), InputField::Value(value.into()));
        self
    }

    pub fn related(
        mut self,
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = NodeInput>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            InputField::Related(inputs.into_iter().collect()),
        );
        self
    }
}

/// Update input: value fields are shallow-merged, relation entries carry
/// add/remove directives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    pub(crate) fields: BTreeMap<String, PatchField>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatchField {
    Value(Value),
    Relation(RelationPatch),
}

/// Relation directives resolved against the store: `add` links matching
/// nodes (idempotently), `remove` unlinks them. Elements are kind-less
/// sub-queries; the related kind is injected before resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationPatch {
    pub(crate) add: Vec<SubQuery>,
    pub(crate) remove: Vec<SubQuery>,
}

impl RelationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, sub: SubQuery) -> Self {
        self.add.push(sub);
        self
    }

    pub fn remove(mut self, sub: SubQuery) -> Self {
        self.remove.push(sub);
        self
    }
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .insert(name.into(), PatchField::Value(value.into()));
        self
    }

    pub fn relation(mut self, name: impl Into<String>, patch: RelationPatch) -> Self {
        self.fields
            .insert(name.into(), PatchField::Relation(patch));
        self
    }
}
