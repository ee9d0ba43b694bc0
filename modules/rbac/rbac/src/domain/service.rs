//! Domain service for the RBAC resolver.

use std::sync::Arc;

use access_filter::WhereClause;
use http::HeaderMap;
use rbac_sdk::{Action, Decision, ResourceType, TenantDirectoryClient, TenantId, User};
use tracing::info;

use super::collection_access::AccessRegistry;
use super::engine::AccessDecisionEngine;
use super::error::DomainError;
use super::fallback::PublicFallbackPolicy;
use super::tenant_context::TenantContextResolver;
use crate::config::RbacConfig;

/// RBAC resolver service.
pub struct Service {
    engine: AccessDecisionEngine,
    registry: AccessRegistry,
    tenant_context: TenantContextResolver,
}

impl Service {
    /// Create a service from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` if `cfg` fails validation.
    pub fn new(
        cfg: &RbacConfig,
        directory: Arc<dyn TenantDirectoryClient>,
    ) -> Result<Self, DomainError> {
        cfg.validate()?;

        info!(
            tenant_cookie = %cfg.tenant_cookie,
            timeout_ms = cfg.tenant_lookup_timeout_ms,
            overrides = cfg.collections.len(),
            "RBAC resolver initialized"
        );

        Ok(Self {
            engine: AccessDecisionEngine::tenant_scoped(),
            registry: AccessRegistry::from_config(cfg),
            tenant_context: TenantContextResolver::from_config(directory, cfg),
        })
    }

    #[must_use]
    pub fn fallback(&self) -> &PublicFallbackPolicy {
        self.registry.fallback()
    }

    #[must_use]
    pub fn registry(&self) -> &AccessRegistry {
        &self.registry
    }

    /// Tenant-scoped decision, filtered on the record's `tenant`.
    #[must_use]
    pub fn decide(
        &self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
    ) -> Decision {
        self.engine.decide(user, action, resource_type)
    }

    #[must_use]
    pub fn apply_fallback(&self, decision: Decision, resource_type: &ResourceType) -> Decision {
        self.fallback().apply(decision, resource_type)
    }

    /// Decision under the policy registered for `resource_type`.
    #[must_use]
    #[tracing::instrument(skip_all, fields(action = %action, resource_type = %resource_type))]
    pub fn evaluate_collection(
        &self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
    ) -> Decision {
        let decision = self.registry.evaluate(user, action, resource_type);
        if decision.is_deny() {
            tracing::debug!(
                policy = ?self.registry.policy_for(resource_type),
                anonymous = user.is_none(),
                "access denied"
            );
        }
        decision
    }

    pub async fn resolve_tenant_context(&self, selector: Option<&str>) -> Option<TenantId> {
        self.tenant_context.resolve(selector).await
    }

    /// Tenant selector read from request cookies.
    #[must_use]
    pub fn tenant_selector(&self, headers: &HeaderMap) -> Option<String> {
        self.tenant_context.selector_from_headers(headers)
    }

    /// Base list filter for the tenant selected in the request cookies.
    pub async fn list_filter(&self, headers: &HeaderMap) -> Option<WhereClause> {
        self.tenant_context.list_filter(headers).await
    }
}
