#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Row-level access filters.
//!
//! An [`AccessScope`] is what the RBAC resolver hands to the storage layer:
//! deny everything, allow everything, or allow the rows matching a
//! [`WhereClause`]. The serialized form of a [`WhereClause`] is the predicate
//! shape the storage layer understands (`{"tenant": {"in": [..]}}`).
pub mod filter;
pub mod scope;

pub use filter::{FieldFilter, FieldValue, WhereClause, fields};
pub use scope::AccessScope;
