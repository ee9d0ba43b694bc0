//! Domain errors for the RBAC resolver.

/// Internal domain errors.
///
/// Evaluation itself never fails; these cover service construction only.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
