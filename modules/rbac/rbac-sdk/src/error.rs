//! Error types for the RBAC resolver module.

use thiserror::Error;

/// Errors raised at the RBAC API boundary.
///
/// Access denial is never an error: it is expressed as
/// [`Decision::Deny`](crate::Decision::Deny).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RbacError {
    /// The action token is not one of `create|read|update|delete`.
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Errors that can occur when looking up tenants.
///
/// Callers resolving a tenant context degrade these to "no tenant".
#[derive(Debug, Error)]
pub enum TenantDirectoryError {
    /// The backing store cannot be reached.
    #[error("tenant directory unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
