//! Tenant context resolution for list views.
//!
//! Maps the tenant selector carried by a request (a slug in a cookie) to a
//! tenant id. This narrows what a list shows on top of access control and is
//! never an access gate: every failure resolves to "no tenant".

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use access_filter::{FieldFilter, WhereClause, fields};
use http::HeaderMap;
use http::header::COOKIE;
use rbac_sdk::{TenantDirectoryClient, TenantId};

use crate::config::RbacConfig;

pub struct TenantContextResolver {
    directory: Arc<dyn TenantDirectoryClient>,
    cookie_name: String,
    timeout: Duration,
}

impl TenantContextResolver {
    #[must_use]
    pub fn new(
        directory: Arc<dyn TenantDirectoryClient>,
        cookie_name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            directory,
            cookie_name: cookie_name.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(directory: Arc<dyn TenantDirectoryClient>, cfg: &RbacConfig) -> Self {
        Self::new(
            directory,
            cfg.tenant_cookie.as_str(),
            cfg.tenant_lookup_timeout(),
        )
    }

    /// Look up the tenant selected by `selector` (a slug).
    ///
    /// The slug is matched exactly as given; a blank selector skips the
    /// lookup. Performs at most one directory lookup, bounded by the
    /// configured timeout.
    #[tracing::instrument(skip_all, fields(selector = tracing::field::Empty))]
    pub async fn resolve(&self, selector: Option<&str>) -> Option<TenantId> {
        let slug = selector.filter(|s| !s.trim().is_empty())?;
        tracing::Span::current().record("selector", slug);

        match tokio::time::timeout(self.timeout, self.directory.find_by_slug(slug)).await {
            Ok(Ok(Some(tenant))) => Some(tenant.id),
            Ok(Ok(None)) => {
                tracing::debug!("no tenant matches selector");
                None
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "tenant lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "tenant lookup timed out"
                );
                None
            }
        }
    }

    /// Extract the tenant selector from the request's `Cookie` headers.
    #[must_use]
    pub fn selector_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == self.cookie_name)
            .map(|(_, value)| decode_cookie_value(value))
            .filter(|value| !value.is_empty())
    }

    pub async fn resolve_from_headers(&self, headers: &HeaderMap) -> Option<TenantId> {
        let selector = self.selector_from_headers(headers);
        self.resolve(selector.as_deref()).await
    }

    /// Base list filter for the selected tenant, if any.
    ///
    /// Callers AND this with the access scope; it can only hide rows.
    pub async fn list_filter(&self, headers: &HeaderMap) -> Option<WhereClause> {
        self.resolve_from_headers(headers)
            .await
            .map(|tenant_id| FieldFilter::equals(fields::TENANT, tenant_id).into())
    }
}

fn decode_cookie_value(raw: &str) -> String {
    let raw = raw.trim();
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    urlencoding::decode(unquoted).map_or_else(|_| unquoted.to_owned(), Cow::into_owned)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http::HeaderValue;
    use rbac_sdk::{Tenant, TenantDirectoryError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;
    use uuid::Uuid;

    enum Behavior {
        Found(Tenant),
        Missing,
        Fails,
        Hangs,
    }

    struct MockDirectory {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl MockDirectory {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TenantDirectoryClient for MockDirectory {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, TenantDirectoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Found(tenant) if tenant.slug == slug => Ok(Some(tenant.clone())),
                Behavior::Found(_) | Behavior::Missing => Ok(None),
                Behavior::Fails => Err(TenantDirectoryError::Unavailable(
                    "connection refused".to_owned(),
                )),
                Behavior::Hangs => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(None)
                }
            }
        }
    }

    fn acme() -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "Acme".to_owned(),
            slug: "acme".to_owned(),
            domains: vec![],
        }
    }

    fn resolver(directory: Arc<MockDirectory>) -> TenantContextResolver {
        TenantContextResolver::new(directory, "payload-tenant", Duration::from_millis(20))
    }

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[tokio::test]
    async fn resolves_known_slug() {
        let tenant = acme();
        let directory = MockDirectory::new(Behavior::Found(tenant.clone()));
        let resolver = resolver(directory.clone());

        assert_eq!(resolver.resolve(Some("acme")).await, Some(tenant.id));
        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_slug_resolves_to_none() {
        let resolver = resolver(MockDirectory::new(Behavior::Missing));
        assert_eq!(resolver.resolve(Some("nope")).await, None);
    }

    #[tokio::test]
    async fn empty_selector_skips_lookup() {
        let directory = MockDirectory::new(Behavior::Fails);
        let resolver = resolver(directory.clone());

        assert_eq!(resolver.resolve(None).await, None);
        assert_eq!(resolver.resolve(Some("  ")).await, None);
        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn selector_is_matched_verbatim() {
        let directory = MockDirectory::new(Behavior::Found(acme()));
        let resolver = resolver(directory.clone());

        assert_eq!(resolver.resolve(Some(" acme")).await, None);
        assert_eq!(resolver.resolve(Some("ACME")).await, None);
        assert_eq!(directory.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn lookup_failure_is_logged_and_degrades_to_none() {
        let resolver = resolver(MockDirectory::new(Behavior::Fails));
        assert_eq!(resolver.resolve(Some("acme")).await, None);
        assert!(logs_contain("tenant lookup failed"));
    }

    #[tokio::test]
    #[traced_test]
    async fn lookup_timeout_degrades_to_none() {
        let resolver = resolver(MockDirectory::new(Behavior::Hangs));
        assert_eq!(resolver.resolve(Some("acme")).await, None);
        assert!(logs_contain("tenant lookup timed out"));
    }

    #[test]
    fn selector_is_read_from_configured_cookie() {
        let resolver = resolver(MockDirectory::new(Behavior::Missing));

        let map = headers(&["theme=dark; payload-tenant=acme; lang=en"]);
        assert_eq!(resolver.selector_from_headers(&map).as_deref(), Some("acme"));

        let map = headers(&["theme=dark", "payload-tenant=\"globex%20inc\""]);
        assert_eq!(
            resolver.selector_from_headers(&map).as_deref(),
            Some("globex inc")
        );

        let map = headers(&["payload-tenant-old=acme; payload-tenant="]);
        assert_eq!(resolver.selector_from_headers(&map), None);

        assert_eq!(resolver.selector_from_headers(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn list_filter_narrows_to_selected_tenant() {
        let tenant = acme();
        let resolver = resolver(MockDirectory::new(Behavior::Found(tenant.clone())));

        let filter = resolver
            .list_filter(&headers(&["payload-tenant=acme"]))
            .await
            .unwrap();
        assert_eq!(filter.uuid_values_for(fields::TENANT), vec![tenant.id]);

        assert!(resolver.list_filter(&HeaderMap::new()).await.is_none());
    }
}
