//! Access decision engine.
//!
//! Combines global and tenant-scoped role bindings into a [`Decision`]:
//!
//! 1. Anonymous callers are denied.
//! 2. A matching global role grants unconditional `Allow`; tenant bindings are
//!    not consulted.
//! 3. Otherwise the grant is restricted to the tenants in which a bound role
//!    matches, or denied when there are none.
//!
//! Rules are additive: there is no deny rule and no rule priority.

use std::collections::BTreeSet;

use rbac_sdk::{Action, Decision, FilterField, ResourceType, User};

use super::matcher::matches_any;
use super::roles::{global_roles_for_user, tenant_roles_for_user};

/// Evaluates decisions, filtering tenant-scoped grants on `field`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessDecisionEngine {
    field: FilterField,
}

impl AccessDecisionEngine {
    #[must_use]
    pub fn new(field: FilterField) -> Self {
        Self { field }
    }

    /// Engine for records carrying a `tenant` reference.
    #[must_use]
    pub fn tenant_scoped() -> Self {
        Self::new(FilterField::Tenant)
    }

    /// Engine for records that are tenants themselves (filtered on `id`).
    #[must_use]
    pub fn by_record_id() -> Self {
        Self::new(FilterField::Id)
    }

    #[must_use]
    pub fn field(self) -> FilterField {
        self.field
    }

    /// Decide whether `user` may perform `action` on `resource_type`.
    #[must_use]
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(action = %action, resource_type = %resource_type, field = self.field.as_str())
    )]
    pub fn decide(
        self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
    ) -> Decision {
        let Some(user) = user else {
            return Decision::Deny;
        };

        if global_grant(user, action, resource_type) {
            tracing::debug!(user_id = %user.id, "granted by global role");
            return Decision::Allow;
        }

        let tenant_ids: BTreeSet<_> = tenant_roles_for_user(user)
            .into_iter()
            .filter(|binding| {
                matches_any(
                    binding.roles.iter().flat_map(|role| &role.rules),
                    action,
                    resource_type,
                )
            })
            .map(|binding| binding.tenant_id)
            .collect();

        tracing::debug!(
            user_id = %user.id,
            tenant_count = tenant_ids.len(),
            "evaluated tenant role bindings"
        );
        Decision::for_tenants(self.field, tenant_ids)
    }
}

/// Decide using global role bindings only: `Allow` or `Deny`.
#[must_use]
pub fn decide_global(user: Option<&User>, action: Action, resource_type: &ResourceType) -> Decision {
    match user {
        Some(user) if global_grant(user, action, resource_type) => Decision::Allow,
        Some(_) | None => Decision::Deny,
    }
}

fn global_grant(user: &User, action: Action, resource_type: &ResourceType) -> bool {
    matches_any(
        global_roles_for_user(user)
            .into_iter()
            .flat_map(|role| &role.rules),
        action,
        resource_type,
    )
}
