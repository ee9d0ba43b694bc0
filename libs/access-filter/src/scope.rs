use serde_json::Value;

use crate::filter::WhereClause;

/// What data a caller may touch, as handed to the storage layer.
///
/// # Examples
///
/// ```
/// use access_filter::{AccessScope, FieldFilter, fields};
/// use uuid::Uuid;
///
/// // deny-all (default)
/// let scope = AccessScope::default();
/// assert!(scope.is_deny_all());
///
/// // single tenant
/// let tid = Uuid::new_v4();
/// let scope = AccessScope::filtered(FieldFilter::r#in(fields::TENANT, [tid]).into());
/// assert!(!scope.is_deny_all());
/// assert_eq!(scope.where_clause().map(|w| w.uuid_values_for(fields::TENANT)), Some(vec![tid]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AccessScope {
    /// No rows are accessible.
    #[default]
    DenyAll,
    /// No row-level filtering applies.
    AllowAll,
    /// Only rows matching the clause are accessible.
    Filtered(WhereClause),
}

impl AccessScope {
    #[must_use]
    pub fn deny_all() -> Self {
        Self::DenyAll
    }

    #[must_use]
    pub fn allow_all() -> Self {
        Self::AllowAll
    }

    #[must_use]
    pub fn filtered(clause: WhereClause) -> Self {
        Self::Filtered(clause)
    }

    #[inline]
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        matches!(self, Self::DenyAll)
    }

    #[inline]
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Self::AllowAll)
    }

    /// The row-level predicate, if this scope is filtered.
    #[must_use]
    pub fn where_clause(&self) -> Option<&WhereClause> {
        match self {
            Self::Filtered(clause) => Some(clause),
            Self::DenyAll | Self::AllowAll => None,
        }
    }

    /// Layer an additional predicate on top of this scope.
    ///
    /// The result is never wider than `self`: deny-all stays deny-all, and a
    /// filtered scope keeps its own predicate alongside `extra`.
    #[must_use]
    pub fn narrow(self, extra: WhereClause) -> Self {
        match self {
            Self::DenyAll => Self::DenyAll,
            Self::AllowAll => Self::Filtered(extra),
            Self::Filtered(clause) => Self::Filtered(clause.and(extra)),
        }
    }

    /// Whether a JSON record is visible under this scope.
    #[must_use]
    pub fn permits(&self, record: &Value) -> bool {
        match self {
            Self::DenyAll => false,
            Self::AllowAll => true,
            Self::Filtered(clause) => clause.matches(record),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::filter::{FieldFilter, fields};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn default_is_deny_all() {
        let scope = AccessScope::default();
        assert!(scope.is_deny_all());
        assert!(!scope.permits(&json!({})));
    }

    #[test]
    fn narrowing_allow_all_yields_extra_filter() {
        let tid = Uuid::new_v4();
        let scope = AccessScope::allow_all()
            .narrow(FieldFilter::equals(fields::TENANT, tid).into());
        assert!(scope.permits(&json!({ "tenant": tid.to_string() })));
        assert!(!scope.permits(&json!({ "tenant": Uuid::new_v4().to_string() })));
    }

    #[test]
    fn narrowing_never_widens() {
        let tid = Uuid::new_v4();
        let denied = AccessScope::deny_all().narrow(FieldFilter::equals(fields::TENANT, tid).into());
        assert!(denied.is_deny_all());

        let other = Uuid::new_v4();
        let scope = AccessScope::filtered(FieldFilter::r#in(fields::TENANT, [tid]).into())
            .narrow(FieldFilter::equals(fields::TENANT, other).into());
        assert!(!scope.permits(&json!({ "tenant": tid.to_string() })));
        assert!(!scope.permits(&json!({ "tenant": other.to_string() })));
    }
}
