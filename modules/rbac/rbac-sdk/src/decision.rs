//! Access decisions.
//!
//! A [`Decision`] is the only thing the resolver returns to a caller. A
//! filtered grant is a distinct variant so it can never be mistaken for an
//! unconditional allow, and a tenant filter cannot be built from an empty set.

use std::collections::BTreeSet;

use access_filter::{AccessScope, FieldFilter, WhereClause, fields};
use serde::{Deserialize, Serialize};

use crate::models::TenantId;

/// Record field a tenant filter constrains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// The record's tenant-ownership reference.
    #[default]
    Tenant,
    /// The record's own id (records that *are* tenants).
    Id,
}

impl FilterField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tenant => fields::TENANT,
            Self::Id => fields::ID,
        }
    }
}

/// Non-empty set of tenants a grant is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantFilter {
    field: FilterField,
    tenant_ids: BTreeSet<TenantId>,
}

impl TenantFilter {
    /// Returns `None` when `tenant_ids` is empty.
    #[must_use]
    pub fn new(field: FilterField, tenant_ids: impl IntoIterator<Item = TenantId>) -> Option<Self> {
        let tenant_ids: BTreeSet<TenantId> = tenant_ids.into_iter().collect();
        if tenant_ids.is_empty() {
            return None;
        }
        Some(Self { field, tenant_ids })
    }

    #[must_use]
    pub fn field(&self) -> FilterField {
        self.field
    }

    #[must_use]
    pub fn tenant_ids(&self) -> &BTreeSet<TenantId> {
        &self.tenant_ids
    }

    #[must_use]
    pub fn to_where(&self) -> WhereClause {
        FieldFilter::r#in(self.field.as_str(), self.tenant_ids.iter()).into()
    }
}

/// Restriction attached to a filtered grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessFilter {
    /// Only records owned by one of these tenants.
    Tenants(TenantFilter),
    /// Only records whose status equals `status`.
    Published { status: String },
}

impl AccessFilter {
    #[must_use]
    pub fn to_where(&self) -> WhereClause {
        match self {
            Self::Tenants(filter) => filter.to_where(),
            Self::Published { status } => {
                FieldFilter::equals(fields::STATUS, status.as_str()).into()
            }
        }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "filter", rename_all = "snake_case")]
pub enum Decision {
    Deny,
    /// Unconditional grant.
    Allow,
    /// Grant restricted to the records matching the filter.
    AllowFiltered(AccessFilter),
}

impl Decision {
    /// Tenant-filtered grant, or `Deny` when no tenant qualifies.
    #[must_use]
    pub fn for_tenants(field: FilterField, tenant_ids: impl IntoIterator<Item = TenantId>) -> Self {
        TenantFilter::new(field, tenant_ids)
            .map_or(Self::Deny, |f| Self::AllowFiltered(AccessFilter::Tenants(f)))
    }

    /// Grant restricted to records in the given publication status.
    #[must_use]
    pub fn published(status: impl Into<String>) -> Self {
        Self::AllowFiltered(AccessFilter::Published {
            status: status.into(),
        })
    }

    #[must_use]
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny)
    }

    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Tenants a tenant-filtered grant is restricted to.
    #[must_use]
    pub fn tenant_ids(&self) -> Option<&BTreeSet<TenantId>> {
        match self {
            Self::AllowFiltered(AccessFilter::Tenants(f)) => Some(f.tenant_ids()),
            Self::Deny | Self::Allow | Self::AllowFiltered(AccessFilter::Published { .. }) => None,
        }
    }

    /// Storage-layer form of this decision.
    #[must_use]
    pub fn to_scope(&self) -> AccessScope {
        match self {
            Self::Deny => AccessScope::deny_all(),
            Self::Allow => AccessScope::allow_all(),
            Self::AllowFiltered(filter) => AccessScope::filtered(filter.to_where()),
        }
    }
}
