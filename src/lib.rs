//! # Token Guard Library
//!
//! Resolves the shared auth token from AWS Secrets Manager, SSM Parameter
//! Store or static configuration, caches it for concurrent readers and
//! authorizes requests against it.
//!
//! Modules:
//! - `sources`: credential sources and the priority chain over them
//! - `cache`: token snapshot and the single-flight token cache
//! - `auth`: request authorization with one refresh on mismatch
//! - `config`: YAML configuration, env expansion and validation
//! - `server` / `observability`: HTTP surface, health and metrics

pub mod auth;
pub mod cache;
pub mod config;
pub mod errors;
pub mod observability;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::auth::Authorizer;
pub use crate::cache::token::{TokenMetadata, TokenSnapshot};
pub use crate::cache::token_cache::TokenCache;
pub use crate::config::credentials::ServiceConfig;
pub use crate::errors::{AuthError, ResolveError};
pub use crate::sources::source_chain::SourceChain;
pub use crate::sources::{CredentialSource, SourceKind};
