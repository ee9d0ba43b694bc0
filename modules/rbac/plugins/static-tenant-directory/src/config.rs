//! Configuration for the static tenant directory plugin.

use serde::Deserialize;
use uuid::Uuid;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticTenantDirectoryConfig {
    /// Tenants served by the directory.
    pub tenants: Vec<TenantConfig>,
}

/// One configured tenant.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    pub id: Uuid,
    pub name: String,
    /// Selector carried in the tenant cookie. Must be unique.
    pub slug: String,
    #[serde(default)]
    pub domains: Vec<String>,
}
