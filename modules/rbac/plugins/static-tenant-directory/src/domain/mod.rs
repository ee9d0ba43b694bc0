//! Domain layer for the static tenant directory plugin.

pub mod client;
pub mod service;

pub use service::Service;
