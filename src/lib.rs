#![forbid(unsafe_code)]

//! In-memory, schema-driven graph repository.
//!
//! A [`GraphRepo`] is constructed from a [`GraphSnapshot`] declaring node
//! kinds, seed nodes/edges, and named relations between kinds. It then
//! accepts nested create, find, update, and delete operations that
//! traverse those relations, returning lazy [`NodeModel`] views whose
//! relation attributes are resolved against the live edge store on every
//! access.
//!
//! ```
//! use trellis::{CreateInput, GraphRepo, GraphSnapshot, NestedInput, NodeInput, RelationSpec};
//!
//! let snapshot = GraphSnapshot::new()
//!     .relation("user", "authors", RelationSpec::outbound("author").with_edge_kind("is"))
//!     .relation("author", "users", RelationSpec::inbound("user").with_edge_kind("is"));
//! let mut repo = GraphRepo::from_snapshot(snapshot)?;
//!
//! let user = repo.create(
//!     CreateInput::new("user").field("username", "steve").related(
//!         "authors",
//!         [NodeInput::nested(NestedInput::new().field("name", "Steve O"))],
//!     ),
//! )?;
//! let authors = user.related("authors");
//! assert_eq!(authors.len(), 1);
//! assert_eq!(authors[0].related("users")[0].id(), user.id());
//! # Ok::<(), trellis::GraphError>(())
//! ```
//!
//! A small flat [`EntityRepo`] sharing the value-operator vocabulary is
//! included for records with no graph shape.

pub mod db;
pub mod entity;
pub mod error;
pub mod model;
pub mod query;
pub mod schema;
pub mod view;

pub use crate::db::{GraphRepo, RepoConfig, RepoMetrics};
pub use crate::entity::{Entity, EntityInput, EntityQuery, EntityRepo, EntitySelector};
pub use crate::error::{GraphError, Result};
pub use crate::model::{Edge, EdgeId, Node, NodeId, Value};
pub use crate::query::input::{
    CreateInput, FieldQuery, NestedInput, NodeInput, NodeQuery, OperatorArg, OperatorMap, Patch,
    PatchField, RelationPatch, Selector, SubQuery, ValueQuery,
};
pub use crate::query::operator::match_value;
pub use crate::schema::{Direction, GraphSnapshot, Relation, RelationSpec, Schema};
pub use crate::view::{Attr, NodeModel};
