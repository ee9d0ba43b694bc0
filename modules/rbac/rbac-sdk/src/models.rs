//! Snapshot models consumed by the RBAC resolver.
//!
//! Everything here is loaded by the caller before evaluation. Relationship
//! fields may arrive unexpanded depending on load depth, which is why they are
//! typed as [`Relation`].

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RbacError;

pub type TenantId = Uuid;
pub type RoleId = Uuid;
pub type UserId = Uuid;
pub type AssignmentId = Uuid;

/// Wire representation of [`RuleTerm::Any`].
pub const WILDCARD: &str = "*";

/// Well-known resource types of the hosting application.
pub mod resource_types {
    pub const ROLES: &str = "roles";
    pub const ROLE_ASSIGNMENTS: &str = "roleAssignments";
    pub const GLOBAL_ROLE_ASSIGNMENTS: &str = "globalRoleAssignments";
    pub const TENANTS: &str = "tenants";
    pub const PAGES: &str = "pages";
    pub const POSTS: &str = "posts";
    pub const USERS: &str = "users";
}

/// Operation kind being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| RbacError::UnknownAction(s.to_owned()))
    }
}

/// Open resource-type identifier (a collection slug in the hosting app).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for ResourceType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One entry of a rule dimension: a concrete value or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleTerm<T> {
    /// Matches anything in this dimension. Serialized as `"*"`.
    Any,
    Exact(T),
    /// A stored token this build does not recognise. Never matches.
    Unknown(String),
}

impl<T: PartialEq> RuleTerm<T> {
    /// Whether this term admits `value`.
    #[must_use]
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(v) => v == value,
            Self::Unknown(_) => false,
        }
    }
}

impl<T: FromStr> FromStr for RuleTerm<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WILDCARD {
            Ok(Self::Any)
        } else {
            s.parse().map(Self::Exact)
        }
    }
}

impl<T: Serialize> Serialize for RuleTerm<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str(WILDCARD),
            Self::Exact(v) => v.serialize(serializer),
            Self::Unknown(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de, T> Deserialize<'de> for RuleTerm<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    /// Unrecognised tokens decode to [`RuleTerm::Unknown`] so that one bad
    /// rule cannot make the enclosing role (or user) undecodable.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.parse() {
            Ok(term) => Ok(term),
            Err(e) => {
                tracing::warn!(token = %raw, error = %e, "unrecognised rule token never matches");
                Ok(Self::Unknown(raw))
            }
        }
    }
}

impl From<Action> for RuleTerm<Action> {
    fn from(action: Action) -> Self {
        Self::Exact(action)
    }
}

impl From<&str> for RuleTerm<ResourceType> {
    fn from(s: &str) -> Self {
        if s == WILDCARD {
            Self::Any
        } else {
            Self::Exact(ResourceType::new(s))
        }
    }
}

/// A permission grant: every listed action on every listed resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub actions: Vec<RuleTerm<Action>>,
    /// Called `collections` on the wire.
    #[serde(rename = "collections", alias = "resourceTypes")]
    pub resource_types: Vec<RuleTerm<ResourceType>>,
}

impl Rule {
    #[must_use]
    pub fn new(
        actions: impl IntoIterator<Item = RuleTerm<Action>>,
        resource_types: impl IntoIterator<Item = RuleTerm<ResourceType>>,
    ) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            resource_types: resource_types.into_iter().collect(),
        }
    }

    /// `*` actions on `*` resource types.
    #[must_use]
    pub fn superuser() -> Self {
        Self::new([RuleTerm::Any], [RuleTerm::Any])
    }
}

/// A named set of rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Role {
    #[must_use]
    pub fn new(id: RoleId, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            id,
            name: name.into(),
            rules,
        }
    }
}

/// A relationship value: either the loaded document or only its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    /// Not expanded at the current load depth.
    Reference(Uuid),
    Expanded(T),
}

impl<T> Relation<T> {
    #[must_use]
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Self::Expanded(doc) => Some(doc),
            Self::Reference(_) => None,
        }
    }

    #[must_use]
    pub fn reference(&self) -> Option<Uuid> {
        match self {
            Self::Reference(id) => Some(*id),
            Self::Expanded(_) => None,
        }
    }
}

impl<T> From<T> for Relation<T> {
    fn from(doc: T) -> Self {
        Self::Expanded(doc)
    }
}

/// A join field: the documents on the other side of a one-to-many relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Join<T> {
    #[serde(default)]
    pub docs: Vec<Relation<T>>,
}

impl<T> Default for Join<T> {
    fn default() -> Self {
        Self { docs: Vec::new() }
    }
}

impl<T> From<Vec<Relation<T>>> for Join<T> {
    fn from(docs: Vec<Relation<T>>) -> Self {
        Self { docs }
    }
}

/// Scoping unit that owns records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// External selector, e.g. carried in the tenant cookie.
    pub slug: String,
    #[serde(default)]
    pub domains: Vec<String>,
}

/// Binds a user to roles in every tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRoleAssignment {
    pub id: AssignmentId,
    #[serde(default)]
    pub roles: Vec<Relation<Role>>,
}

/// Binds a user to roles within exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: AssignmentId,
    #[serde(default)]
    pub tenant: Option<Relation<Tenant>>,
    #[serde(default)]
    pub roles: Vec<Relation<Role>>,
}

/// An authenticated user with role relationships loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub global_roles: Join<GlobalRoleAssignment>,
    #[serde(default)]
    pub roles: Join<RoleAssignment>,
}

impl User {
    /// A user with no role relationships.
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            global_roles: Join::default(),
            roles: Join::default(),
        }
    }

    #[must_use]
    pub fn with_global_assignment(mut self, assignment: GlobalRoleAssignment) -> Self {
        self.global_roles.docs.push(assignment.into());
        self
    }

    #[must_use]
    pub fn with_assignment(mut self, assignment: RoleAssignment) -> Self {
        self.roles.docs.push(assignment.into());
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_parses_known_tokens_only() {
        assert_eq!("read".parse::<Action>().unwrap(), Action::Read);
        assert!(matches!(
            "publish".parse::<Action>(),
            Err(RbacError::UnknownAction(token)) if token == "publish"
        ));
    }

    #[test]
    fn wildcard_is_decoded_into_any() {
        let rule: Rule = serde_json::from_value(json!({
            "actions": ["*"],
            "collections": ["posts", "*"],
        }))
        .unwrap();

        assert_eq!(rule.actions, vec![RuleTerm::Any]);
        assert_eq!(
            rule.resource_types,
            vec![RuleTerm::Exact(ResourceType::new("posts")), RuleTerm::Any]
        );
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({ "actions": ["*"], "collections": ["posts", "*"] })
        );
    }

    #[test]
    fn unknown_action_in_rule_decodes_to_non_matching_term() {
        let rule: Rule = serde_json::from_value(json!({
            "actions": ["publish", "read"],
            "collections": ["posts"],
        }))
        .unwrap();

        assert_eq!(
            rule.actions,
            vec![RuleTerm::Unknown("publish".to_owned()), Action::Read.into()]
        );
        assert!(Action::ALL.iter().all(|a| !rule.actions[0].admits(a)));
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({ "actions": ["publish", "read"], "collections": ["posts"] })
        );
    }

    #[test]
    fn user_with_unknown_rule_token_still_decodes() {
        let user: User = serde_json::from_value(json!({
            "id": Uuid::new_v4().to_string(),
            "globalRoles": { "docs": [{
                "id": Uuid::new_v4().to_string(),
                "roles": [
                    {
                        "id": Uuid::new_v4().to_string(),
                        "name": "Admin",
                        "rules": [{ "actions": ["*"], "collections": ["*"] }],
                    },
                    {
                        "id": Uuid::new_v4().to_string(),
                        "name": "Publisher",
                        "rules": [{ "actions": ["publish"], "collections": ["posts"] }],
                    },
                ],
            }] },
        }))
        .unwrap();

        let assignment = user.global_roles.docs[0].expanded().unwrap();
        assert_eq!(assignment.roles.len(), 2);
        assert!(assignment.roles.iter().all(|r| r.expanded().is_some()));
    }

    #[test]
    fn relation_decodes_reference_or_document() {
        let role_id = Uuid::new_v4();
        let reference: Relation<Role> = serde_json::from_value(json!(role_id.to_string())).unwrap();
        assert_eq!(reference.reference(), Some(role_id));

        let expanded: Relation<Role> = serde_json::from_value(json!({
            "id": role_id.to_string(),
            "name": "Viewer",
            "rules": [{ "actions": ["read"], "collections": ["*"] }],
        }))
        .unwrap();
        assert_eq!(expanded.expanded().map(|r| r.name.as_str()), Some("Viewer"));
    }

    #[test]
    fn user_without_loaded_joins_has_no_bindings() {
        let user: User = serde_json::from_value(json!({ "id": Uuid::new_v4().to_string() })).unwrap();
        assert!(user.global_roles.docs.is_empty());
        assert!(user.roles.docs.is_empty());
    }
}
