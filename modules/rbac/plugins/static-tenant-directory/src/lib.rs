#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Tenant Directory Plugin
//!
//! Serves tenant lookups for the RBAC resolver from configuration. Intended
//! for development, tests and single-node deployments with a fixed tenant set.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   static_tenant_directory:
//!     config:
//!       tenants:
//!         - id: "7b2e1f0c-6a88-4768-9dfc-6bcd5187d9ed"
//!           name: "Acme"
//!           slug: "acme"
//!           domains: ["acme.example.com"]
//! ```

pub mod config;
pub mod domain;

pub use config::StaticTenantDirectoryConfig;
pub use domain::Service;
