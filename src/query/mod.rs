//! Query input model and evaluation.
//!
//! Inputs are plain data built fluently at call sites; evaluation happens
//! against the repository, which partitions each entry into a value
//! predicate or a relation sub-query by consulting the schema.

/// Input types for queries, create trees, patches, and selectors.
pub mod input;

/// Value-level operator evaluation shared with the flat entity repository.
pub mod operator;

mod matcher;

pub use input::{NodeQuery, OperatorMap, Selector, SubQuery, ValueQuery};
pub use operator::match_value;
