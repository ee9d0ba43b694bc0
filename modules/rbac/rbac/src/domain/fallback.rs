//! Published-content fallback for publicly browsable resource types.

use std::collections::BTreeSet;

use rbac_sdk::{Decision, ResourceType};

use crate::config::RbacConfig;

/// Turns a `Deny` on a publishable resource type into a published-only grant.
///
/// The resulting filter constrains publication status, not tenancy, so the
/// storage layer can combine it with any other attribute match. `Allow` and
/// tenant-filtered grants always take precedence and pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicFallbackPolicy {
    published_status: String,
    resource_types: BTreeSet<ResourceType>,
}

impl PublicFallbackPolicy {
    #[must_use]
    pub fn new(
        published_status: impl Into<String>,
        resource_types: impl IntoIterator<Item = ResourceType>,
    ) -> Self {
        Self {
            published_status: published_status.into(),
            resource_types: resource_types.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &RbacConfig) -> Self {
        Self::new(
            cfg.published_status.as_str(),
            cfg.published_resource_types.iter().cloned(),
        )
    }

    /// Treat `resource_type` as publishable. Returns `false` if it already was.
    pub fn add_resource_type(&mut self, resource_type: ResourceType) -> bool {
        self.resource_types.insert(resource_type)
    }

    /// Whether `resource_type` has a published/unpublished lifecycle.
    #[must_use]
    pub fn supports(&self, resource_type: &ResourceType) -> bool {
        self.resource_types.contains(resource_type)
    }

    #[must_use]
    pub fn apply(&self, decision: Decision, resource_type: &ResourceType) -> Decision {
        match decision {
            Decision::Deny if self.supports(resource_type) => {
                tracing::debug!(
                    resource_type = %resource_type,
                    status = %self.published_status,
                    "falling back to published records"
                );
                Decision::published(self.published_status.as_str())
            }
            other => other,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use rbac_sdk::FilterField;
    use uuid::Uuid;

    fn policy() -> PublicFallbackPolicy {
        PublicFallbackPolicy::from_config(&RbacConfig::default())
    }

    #[test]
    fn deny_on_publishable_type_becomes_published_only() {
        let pages = ResourceType::new("pages");
        let decision = policy().apply(Decision::Deny, &pages);
        assert_eq!(decision, Decision::published("published"));
        assert!(!decision.is_deny());
        assert!(!decision.is_unconditional());
    }

    #[test]
    fn deny_on_other_types_is_kept() {
        let roles = ResourceType::new("roles");
        assert_eq!(policy().apply(Decision::Deny, &roles), Decision::Deny);
    }

    #[test]
    fn grants_take_precedence() {
        let pages = ResourceType::new("pages");
        assert_eq!(policy().apply(Decision::Allow, &pages), Decision::Allow);

        let tenant_grant = Decision::for_tenants(FilterField::Tenant, [Uuid::new_v4()]);
        assert_eq!(policy().apply(tenant_grant.clone(), &pages), tenant_grant);
    }

    #[test]
    fn custom_status_value_is_used() {
        let policy = PublicFallbackPolicy::new("live", [ResourceType::new("articles")]);
        assert_eq!(
            policy.apply(Decision::Deny, &ResourceType::new("articles")),
            Decision::published("live")
        );
    }
}
