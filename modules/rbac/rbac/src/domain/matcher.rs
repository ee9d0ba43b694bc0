//! Rule matching.

use rbac_sdk::{Action, ResourceType, Rule};

/// Whether `rule` grants `action` on `resource_type`.
///
/// Both dimensions are checked independently; either may be satisfied by a
/// wildcard.
#[must_use]
pub fn matches(rule: &Rule, action: Action, resource_type: &ResourceType) -> bool {
    let action_matches = rule.actions.iter().any(|term| term.admits(&action));
    let resource_matches = rule
        .resource_types
        .iter()
        .any(|term| term.admits(resource_type));
    action_matches && resource_matches
}

/// Whether any of `rules` grants `action` on `resource_type`.
#[must_use]
pub fn matches_any<'a>(
    rules: impl IntoIterator<Item = &'a Rule>,
    action: Action,
    resource_type: &ResourceType,
) -> bool {
    rules
        .into_iter()
        .any(|rule| matches(rule, action, resource_type))
}
