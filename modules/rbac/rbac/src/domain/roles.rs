//! Role resolution from a user's pre-loaded relationships.
//!
//! Unexpanded references are reported and skipped. A grant that cannot be
//! inspected is unavailable for this request; it neither fails resolution
//! nor contributes to a decision.

use rbac_sdk::{Relation, Role, TenantId, User};
use uuid::Uuid;

/// Kind of relationship that arrived unexpanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedRelationship {
    GlobalAssignment,
    GlobalAssignmentRole,
    TenantAssignment,
    TenantAssignmentRole,
    TenantAssignmentTenant,
    /// The assignment has no tenant at all.
    TenantAssignmentWithoutTenant,
}

impl MalformedRelationship {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlobalAssignment => "global_role_assignment",
            Self::GlobalAssignmentRole => "global_role_assignment.role",
            Self::TenantAssignment => "role_assignment",
            Self::TenantAssignmentRole => "role_assignment.role",
            Self::TenantAssignmentTenant => "role_assignment.tenant",
            Self::TenantAssignmentWithoutTenant => "role_assignment.missing_tenant",
        }
    }
}

fn report(user: &User, kind: MalformedRelationship, reference: Uuid) {
    tracing::warn!(
        user_id = %user.id,
        relationship = kind.as_str(),
        reference = %reference,
        "unexpanded relationship skipped"
    );
}

/// Expanded roles of `refs`, reporting each unexpanded one as `kind`.
fn expanded_roles<'a>(
    user: &User,
    refs: &'a [Relation<Role>],
    kind: MalformedRelationship,
) -> impl Iterator<Item = &'a Role> {
    refs.iter().filter_map(move |relation| match relation {
        Relation::Expanded(role) => Some(role),
        Relation::Reference(id) => {
            report(user, kind, *id);
            None
        }
    })
}

/// Roles bound to the tenant of one role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRoles<'a> {
    pub tenant_id: TenantId,
    pub roles: Vec<&'a Role>,
}

/// All roles bound to `user` at global scope, in assignment order.
#[must_use]
pub fn global_roles_for_user(user: &User) -> Vec<&Role> {
    let mut roles = Vec::new();
    for relation in &user.global_roles.docs {
        match relation {
            Relation::Expanded(assignment) => roles.extend(expanded_roles(
                user,
                &assignment.roles,
                MalformedRelationship::GlobalAssignmentRole,
            )),
            Relation::Reference(id) => {
                report(user, MalformedRelationship::GlobalAssignment, *id);
            }
        }
    }
    roles
}

/// Tenant bindings of `user`, one entry per role assignment, in assignment order.
///
/// An assignment whose tenant is not expanded (or missing) is excluded as a
/// whole, since its grant cannot be attributed to a tenant.
#[must_use]
pub fn tenant_roles_for_user(user: &User) -> Vec<TenantRoles<'_>> {
    let mut bindings = Vec::new();
    for relation in &user.roles.docs {
        let assignment = match relation {
            Relation::Expanded(assignment) => assignment,
            Relation::Reference(id) => {
                report(user, MalformedRelationship::TenantAssignment, *id);
                continue;
            }
        };

        let tenant_id = match &assignment.tenant {
            Some(Relation::Expanded(tenant)) => tenant.id,
            Some(Relation::Reference(id)) => {
                report(user, MalformedRelationship::TenantAssignmentTenant, *id);
                continue;
            }
            None => {
                report(
                    user,
                    MalformedRelationship::TenantAssignmentWithoutTenant,
                    assignment.id,
                );
                continue;
            }
        };

        bindings.push(TenantRoles {
            tenant_id,
            roles: expanded_roles(
                user,
                &assignment.roles,
                MalformedRelationship::TenantAssignmentRole,
            )
            .collect(),
        });
    }
    bindings
}
