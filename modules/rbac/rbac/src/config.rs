//! Configuration for the RBAC resolver.

use std::collections::BTreeMap;
use std::time::Duration;

use rbac_sdk::{ResourceType, resource_types};
use serde::Deserialize;

use crate::domain::{CollectionAccess, DomainError};

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RbacConfig {
    /// Cookie carrying the tenant selector (a tenant slug).
    pub tenant_cookie: String,

    /// Upper bound on a single tenant lookup, in milliseconds.
    pub tenant_lookup_timeout_ms: u64,

    /// Status value of published records.
    pub published_status: String,

    /// Resource types with a draft/published lifecycle.
    pub published_resource_types: Vec<ResourceType>,

    /// Access policy overrides, keyed by resource type.
    pub collections: BTreeMap<ResourceType, CollectionAccess>,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            tenant_cookie: "payload-tenant".to_owned(),
            tenant_lookup_timeout_ms: 2_000,
            published_status: "published".to_owned(),
            published_resource_types: vec![
                ResourceType::new(resource_types::PAGES),
                ResourceType::new(resource_types::POSTS),
            ],
            collections: BTreeMap::new(),
        }
    }
}

impl RbacConfig {
    #[must_use]
    pub fn tenant_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.tenant_lookup_timeout_ms)
    }

    /// Check the configuration for values the resolver cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.tenant_cookie.is_empty()
            || self
                .tenant_cookie
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '=' | ','))
        {
            return Err(DomainError::InvalidConfig {
                field: "tenant_cookie",
                reason: format!("'{}' is not a valid cookie name", self.tenant_cookie),
            });
        }

        if self.tenant_lookup_timeout_ms == 0 {
            return Err(DomainError::InvalidConfig {
                field: "tenant_lookup_timeout_ms",
                reason: "must be greater than zero".to_owned(),
            });
        }

        if self.published_status.trim().is_empty() {
            return Err(DomainError::InvalidConfig {
                field: "published_status",
                reason: "must not be empty".to_owned(),
            });
        }

        for (resource_type, access) in &self.collections {
            if *access == CollectionAccess::TenantOrReadPublished
                && !self.published_resource_types.contains(resource_type)
            {
                return Err(DomainError::InvalidConfig {
                    field: "collections",
                    reason: format!(
                        "'{resource_type}' reads published records but is not listed in published_resource_types"
                    ),
                });
            }
        }

        Ok(())
    }
}
