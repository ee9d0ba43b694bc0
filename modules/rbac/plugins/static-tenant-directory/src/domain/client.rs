//! Client implementation for the static tenant directory plugin.
//!
//! Implements `TenantDirectoryClient` using the domain service.

use async_trait::async_trait;
use rbac_sdk::{Tenant, TenantDirectoryClient, TenantDirectoryError};

use super::service::Service;

#[async_trait]
impl TenantDirectoryClient for Service {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, TenantDirectoryError> {
        Ok(self.find(slug).cloned())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{StaticTenantDirectoryConfig, TenantConfig};
    use std::sync::Arc;
    use uuid::Uuid;

    fn service() -> Service {
        Service::from_config(&StaticTenantDirectoryConfig {
            tenants: vec![TenantConfig {
                id: Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap(),
                name: "Acme".to_owned(),
                slug: "acme".to_owned(),
                domains: vec!["acme.example.com".to_owned()],
            }],
        })
    }

    #[tokio::test]
    async fn find_by_slug_returns_configured_tenant() {
        let tenant = service().find_by_slug("acme").await.unwrap().unwrap();
        assert_eq!(tenant.name, "Acme");
        assert_eq!(tenant.domains, vec!["acme.example.com"]);
    }

    #[tokio::test]
    async fn unknown_slug_is_not_an_error() {
        assert!(service().find_by_slug("initech").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let directory: Arc<dyn TenantDirectoryClient> = Arc::new(service());
        assert!(directory.find_by_slug("acme").await.unwrap().is_some());
    }
}
