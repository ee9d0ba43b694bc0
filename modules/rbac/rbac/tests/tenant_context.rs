#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tenant context resolution against the static tenant directory.

use std::sync::Arc;

use access_filter::fields;
use http::header::COOKIE;
use http::{HeaderMap, HeaderValue};
use rbac::{RbacConfig, Service};
use static_tenant_directory::StaticTenantDirectoryConfig;
use uuid::Uuid;

const ACME: &str = "11111111-1111-1111-1111-111111111111";

fn service() -> Service {
    let directory_cfg: StaticTenantDirectoryConfig = serde_json::from_value(serde_json::json!({
        "tenants": [
            { "id": ACME, "name": "Acme", "slug": "acme" },
            { "id": "22222222-2222-2222-2222-222222222222", "name": "Globex", "slug": "globex" },
        ]
    }))
    .unwrap();
    let directory = static_tenant_directory::Service::from_config(&directory_cfg);
    Service::new(&RbacConfig::default(), Arc::new(directory)).unwrap()
}

fn cookie(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static(value));
    headers
}

#[tokio::test]
async fn cookie_slug_resolves_to_tenant_filter() {
    let svc = service();
    let acme = Uuid::parse_str(ACME).unwrap();

    assert_eq!(svc.resolve_tenant_context(Some("acme")).await, Some(acme));

    let filter = svc
        .list_filter(&cookie("session=abc; payload-tenant=acme"))
        .await
        .unwrap();
    assert_eq!(filter.uuid_values_for(fields::TENANT), vec![acme]);
    assert_eq!(
        serde_json::to_value(&filter).unwrap(),
        serde_json::json!({ "tenant": { "equals": ACME } })
    );
}

#[tokio::test]
async fn unknown_or_missing_selector_yields_no_filter() {
    let svc = service();
    assert!(svc.list_filter(&cookie("payload-tenant=initech")).await.is_none());
    assert!(svc.list_filter(&cookie("session=abc")).await.is_none());
    assert!(svc.list_filter(&HeaderMap::new()).await.is_none());
}

#[tokio::test]
async fn list_filter_narrows_but_never_widens_access() {
    let svc = service();
    let posts = rbac_sdk::ResourceType::new("posts");

    let denied = svc.evaluate_collection(None, rbac_sdk::Action::Update, &posts);
    let extra = svc.list_filter(&cookie("payload-tenant=acme")).await.unwrap();
    let scope = denied.to_scope().narrow(extra);
    assert!(scope.is_deny_all());

    let published = svc.evaluate_collection(None, rbac_sdk::Action::Read, &posts);
    let extra = svc.list_filter(&cookie("payload-tenant=acme")).await.unwrap();
    let scope = published.to_scope().narrow(extra);
    assert!(scope.permits(&serde_json::json!({ "_status": "published", "tenant": ACME })));
    assert!(!scope.permits(&serde_json::json!({
        "_status": "published",
        "tenant": "22222222-2222-2222-2222-222222222222"
    })));
}
