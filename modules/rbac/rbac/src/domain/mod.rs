//! Domain layer for the RBAC resolver.

pub mod collection_access;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod local_client;
pub mod matcher;
pub mod roles;
pub mod service;
pub mod tenant_context;

pub use collection_access::{AccessRegistry, CollectionAccess};
pub use engine::AccessDecisionEngine;
pub use error::DomainError;
pub use fallback::PublicFallbackPolicy;
pub use local_client::RbacLocalClient;
pub use service::Service;
pub use tenant_context::TenantContextResolver;
