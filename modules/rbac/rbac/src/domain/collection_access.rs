//! Per-resource-type access policies.

use std::collections::BTreeMap;

use rbac_sdk::{Action, Decision, ResourceType, User, resource_types};
use serde::{Deserialize, Serialize};

use super::engine::{AccessDecisionEngine, decide_global};
use super::fallback::PublicFallbackPolicy;
use crate::config::RbacConfig;

/// How access to a resource type is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionAccess {
    /// Global roles only; tenant bindings never grant access.
    GlobalRole,
    /// Tenant-scoped evaluation, filtered on the record's `tenant`.
    #[default]
    Tenant,
    /// Tenant-scoped writes; reads fall back to published records.
    ///
    /// Create, update and delete all require the `update` action.
    TenantOrReadPublished,
    /// Global roles, else tenant-scoped evaluation filtered on the record's
    /// own `id`. Used for the tenant records themselves.
    GlobalRoleOrTenantIds,
    /// Any signed-in user; roles are not consulted.
    Authenticated,
}

impl CollectionAccess {
    #[must_use]
    pub fn evaluate(
        self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
        fallback: &PublicFallbackPolicy,
    ) -> Decision {
        match self {
            Self::GlobalRole => decide_global(user, action, resource_type),
            Self::Tenant => AccessDecisionEngine::tenant_scoped().decide(user, action, resource_type),
            Self::TenantOrReadPublished => {
                let engine = AccessDecisionEngine::tenant_scoped();
                match action {
                    Action::Read => {
                        fallback.apply(engine.decide(user, action, resource_type), resource_type)
                    }
                    Action::Create | Action::Update | Action::Delete => {
                        engine.decide(user, Action::Update, resource_type)
                    }
                }
            }
            Self::GlobalRoleOrTenantIds => {
                AccessDecisionEngine::by_record_id().decide(user, action, resource_type)
            }
            Self::Authenticated => {
                if user.is_some() {
                    Decision::Allow
                } else {
                    Decision::Deny
                }
            }
        }
    }
}

/// Access policy per resource type. Unregistered types use
/// [`CollectionAccess::Tenant`].
#[derive(Debug, Clone)]
pub struct AccessRegistry {
    policies: BTreeMap<ResourceType, CollectionAccess>,
    fallback: PublicFallbackPolicy,
}

impl AccessRegistry {
    /// Empty registry: every resource type is tenant-scoped.
    #[must_use]
    pub fn new(fallback: PublicFallbackPolicy) -> Self {
        Self {
            policies: BTreeMap::new(),
            fallback,
        }
    }

    /// Registry with the built-in collections registered.
    #[must_use]
    pub fn with_defaults(fallback: PublicFallbackPolicy) -> Self {
        let mut registry = Self::new(fallback);
        for (name, access) in [
            (resource_types::ROLES, CollectionAccess::GlobalRole),
            (resource_types::GLOBAL_ROLE_ASSIGNMENTS, CollectionAccess::GlobalRole),
            (resource_types::ROLE_ASSIGNMENTS, CollectionAccess::Tenant),
            (resource_types::TENANTS, CollectionAccess::GlobalRoleOrTenantIds),
            (resource_types::PAGES, CollectionAccess::TenantOrReadPublished),
            (resource_types::POSTS, CollectionAccess::TenantOrReadPublished),
            (resource_types::USERS, CollectionAccess::Authenticated),
        ] {
            registry.register(ResourceType::new(name), access);
        }
        registry
    }

    /// Defaults overlaid with the `collections` overrides from `cfg`.
    #[must_use]
    pub fn from_config(cfg: &RbacConfig) -> Self {
        let mut registry = Self::with_defaults(PublicFallbackPolicy::from_config(cfg));
        for (resource_type, access) in &cfg.collections {
            registry.register(resource_type.clone(), *access);
        }
        registry
    }

    /// Register `access` for `resource_type`, replacing any previous policy.
    ///
    /// A `TenantOrReadPublished` type is also made publishable, so anonymous
    /// reads of it get the published-only filter.
    pub fn register(&mut self, resource_type: ResourceType, access: CollectionAccess) {
        if access == CollectionAccess::TenantOrReadPublished
            && self.fallback.add_resource_type(resource_type.clone())
        {
            tracing::warn!(
                resource_type = %resource_type,
                "resource type reads published records but was not publishable; added"
            );
        }
        if let Some(previous) = self.policies.insert(resource_type.clone(), access)
            && previous != access
        {
            tracing::debug!(
                resource_type = %resource_type,
                ?previous,
                ?access,
                "collection access policy replaced"
            );
        }
    }

    #[must_use]
    pub fn policy_for(&self, resource_type: &ResourceType) -> CollectionAccess {
        self.policies
            .get(resource_type)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn fallback(&self) -> &PublicFallbackPolicy {
        &self.fallback
    }

    #[must_use]
    pub fn evaluate(
        &self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
    ) -> Decision {
        self.policy_for(resource_type)
            .evaluate(user, action, resource_type, &self.fallback)
    }
}
