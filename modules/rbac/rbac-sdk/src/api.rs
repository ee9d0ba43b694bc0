//! Public API traits for the RBAC resolver.

use async_trait::async_trait;

use crate::decision::Decision;
use crate::error::TenantDirectoryError;
use crate::models::{Action, ResourceType, Tenant, TenantId, User};

/// Public API trait for the RBAC resolver.
///
/// Request handlers consume this to authorize operations:
///
/// ```ignore
/// let decision = rbac.decide(user.as_ref(), Action::Read, &posts);
/// let decision = rbac.apply_fallback(decision, &posts);
/// let default_tenant = rbac.resolve_tenant_context(cookie_value.as_deref()).await;
/// ```
#[async_trait]
pub trait RbacClient: Send + Sync {
    /// Tenant-scoped decision for `action` on `resource_type`.
    ///
    /// `None` is the anonymous caller and is always denied.
    fn decide(&self, user: Option<&User>, action: Action, resource_type: &ResourceType)
    -> Decision;

    /// Downgrade a `Deny` to a published-only grant for publishable resource types.
    fn apply_fallback(&self, decision: Decision, resource_type: &ResourceType) -> Decision;

    /// Decision under the access policy registered for `resource_type`.
    fn evaluate_collection(
        &self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
    ) -> Decision;

    /// Map a tenant selector (slug) to a tenant id.
    ///
    /// Lookup failures resolve to `None`; this only narrows list views and
    /// never gates access.
    async fn resolve_tenant_context(&self, selector: Option<&str>) -> Option<TenantId>;
}

/// Tenant lookup implemented by directory plugins.
#[async_trait]
pub trait TenantDirectoryClient: Send + Sync {
    /// Find the tenant with exactly this slug.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the backing store cannot be reached
    /// - `Internal` for unexpected errors
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, TenantDirectoryError>;
}
