//! Service implementation for the static tenant directory plugin.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rbac_sdk::Tenant;

use crate::config::StaticTenantDirectoryConfig;

/// Static tenant directory service.
///
/// Tenants are indexed by slug at construction time. Configured slugs are
/// trimmed when loaded; lookups match exactly. When two tenants share a slug,
/// the first one configured wins.
pub struct Service {
    by_slug: HashMap<String, Tenant>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticTenantDirectoryConfig) -> Self {
        let mut by_slug = HashMap::with_capacity(cfg.tenants.len());

        for t in &cfg.tenants {
            let slug = t.slug.trim();
            if slug.is_empty() {
                tracing::warn!(tenant_id = %t.id, "tenant without slug ignored");
                continue;
            }
            match by_slug.entry(slug.to_owned()) {
                Entry::Occupied(existing) => {
                    let existing: &Tenant = existing.get();
                    tracing::warn!(
                        slug,
                        kept = %existing.id,
                        ignored = %t.id,
                        "duplicate tenant slug"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(Tenant {
                        id: t.id,
                        name: t.name.clone(),
                        slug: slug.to_owned(),
                        domains: t.domains.clone(),
                    });
                }
            }
        }

        tracing::debug!(tenant_count = by_slug.len(), "static tenant directory loaded");
        Self { by_slug }
    }

    /// Tenant with exactly this slug.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&Tenant> {
        self.by_slug.get(slug)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}
