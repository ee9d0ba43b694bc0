#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! RBAC resolver module.
//!
//! Decides whether a user may perform an action on a resource type, using
//! roles bound globally or per tenant. See [`domain::Service`] for the entry
//! point and [`domain::RbacLocalClient`] for the [`rbac_sdk::RbacClient`]
//! implementation.

pub mod config;
pub mod domain;

pub use config::RbacConfig;
pub use domain::{DomainError, RbacLocalClient, Service};
