#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! RBAC SDK
//!
//! This crate provides the public API for the `rbac` module:
//!
//! - [`RbacClient`] - Public API trait for consumers (request handlers)
//! - [`TenantDirectoryClient`] - Tenant lookup trait implemented by directory plugins
//! - [`User`], [`Role`], [`Rule`], [`Tenant`] - Snapshot models
//! - [`Relation`] - Expanded-or-reference relationship values
//! - [`Decision`] - Access decision (`Deny | Allow | AllowFiltered`)
//! - [`RbacError`], [`TenantDirectoryError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use rbac_sdk::{Action, RbacClient, ResourceType};
//!
//! let decision = rbac.decide(Some(&user), Action::Read, &ResourceType::new("posts"));
//! let scope = rbac
//!     .apply_fallback(decision, &ResourceType::new("posts"))
//!     .to_scope();
//!
//! // hand `scope` to the storage layer
//! ```

pub mod api;
pub mod decision;
pub mod error;
pub mod models;

pub use api::{RbacClient, TenantDirectoryClient};
pub use decision::{AccessFilter, Decision, FilterField, TenantFilter};
pub use error::{RbacError, TenantDirectoryError};
pub use models::{
    Action, AssignmentId, GlobalRoleAssignment, Join, Relation, Role, RoleAssignment, RoleId,
    ResourceType, Rule, RuleTerm, Tenant, TenantId, User, UserId, resource_types,
};
