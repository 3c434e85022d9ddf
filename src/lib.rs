//! # Growatt Plant Library
//!
//! Talks to the Growatt OSS monitoring API on behalf of a plant registry:
//! logs in with configured credentials, caches the bearer token and
//! forwards read requests for plants and their equipment.
//!
//! Modules:
//! - `config` — service configuration, loading and validation
//! - `cache` — bearer token store with a fixed TTL
//! - `auth` — login and token access
//! - `api` — vendor endpoint callers and composite plant lookups
//! - `server` — HTTP surface exposing the lookups
//! - `observability` — metrics and the error log sink

pub mod config;
pub mod cache;
pub mod auth;
pub mod api;
pub mod error;
pub mod observability;
pub mod server;
pub mod helpers;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::api::client::OssClient;
pub use crate::config::settings::ServiceConfig;
pub use crate::error::OssError;
