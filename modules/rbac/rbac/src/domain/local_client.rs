//! Local (in-process) client for the RBAC resolver.

use std::sync::Arc;

use async_trait::async_trait;
use rbac_sdk::{Action, Decision, RbacClient, ResourceType, TenantId, User};

use super::Service;

/// Local client wrapping the service.
pub struct RbacLocalClient {
    svc: Arc<Service>,
}

impl RbacLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl RbacClient for RbacLocalClient {
    fn decide(
        &self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
    ) -> Decision {
        self.svc.decide(user, action, resource_type)
    }

    fn apply_fallback(&self, decision: Decision, resource_type: &ResourceType) -> Decision {
        self.svc.apply_fallback(decision, resource_type)
    }

    fn evaluate_collection(
        &self,
        user: Option<&User>,
        action: Action,
        resource_type: &ResourceType,
    ) -> Decision {
        self.svc.evaluate_collection(user, action, resource_type)
    }

    async fn resolve_tenant_context(&self, selector: Option<&str>) -> Option<TenantId> {
        self.svc.resolve_tenant_context(selector).await
    }
}
