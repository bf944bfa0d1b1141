//! Sources module
//!
//! Credential sources in priority order, the client seams they call into and
//! the chain that picks the first configured one.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::cache::token::TokenSnapshot;
use crate::errors::ResolveError;
use crate::utils::constants::REDACTED;

pub mod builder;
pub mod parameter_store;
pub mod secrets_store;
pub mod source_chain;
pub mod static_value;

/// Provenance of a token. Declaration order is resolution priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    SecretsStore,
    ParameterStore,
    StaticConfig,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::SecretsStore => "SECRETS_STORE",
            SourceKind::ParameterStore => "PARAMETER_STORE",
            SourceKind::StaticConfig => "STATIC_CONFIG",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a secret string by identifier (AWS Secrets Manager or a fake).
#[async_trait]
pub trait SecretStoreClient: Send + Sync {
    async fn get_secret_value(&self, secret_id: &str) -> Result<Option<String>>;
}

/// Reads a parameter by name (AWS SSM Parameter Store or a fake).
#[async_trait]
pub trait ParameterStoreClient: Send + Sync {
    async fn get_parameter(&self, name: &str, with_decryption: bool) -> Result<Option<String>>;
}

/// Anything able to produce a fresh token snapshot. Implemented by
/// [`source_chain::SourceChain`]; the cache only depends on this seam.
#[async_trait]
pub trait ResolveToken: Send + Sync {
    async fn resolve(&self) -> Result<TokenSnapshot, ResolveError>;
}

#[derive(Clone)]
pub enum CredentialSource {
    SecretsStore {
        secret_id: String,
        client: Option<Arc<dyn SecretStoreClient>>,
    },
    ParameterStore {
        parameter_name: String,
        client: Option<Arc<dyn ParameterStoreClient>>,
    },
    StaticConfig {
        value: String,
    },
}

impl CredentialSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            CredentialSource::SecretsStore { .. } => SourceKind::SecretsStore,
            CredentialSource::ParameterStore { .. } => SourceKind::ParameterStore,
            CredentialSource::StaticConfig { .. } => SourceKind::StaticConfig,
        }
    }

    /// Identifying key: secret id, parameter name or the literal value itself.
    fn key(&self) -> &str {
        match self {
            CredentialSource::SecretsStore { secret_id, .. } => secret_id,
            CredentialSource::ParameterStore { parameter_name, .. } => parameter_name,
            CredentialSource::StaticConfig { value } => value,
        }
    }

    /// Key safe to log; the static value is redacted.
    pub fn display_key(&self) -> &str {
        match self {
            CredentialSource::StaticConfig { .. } => REDACTED,
            _ => self.key(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.key().trim().is_empty()
    }

    /// `Ok(None)` when the source is not configured. A configured source
    /// either yields a non-blank value or fails.
    pub async fn resolve(&self) -> Result<Option<String>, ResolveError> {
        if !self.is_configured() {
            debug!("source {} not configured, skipping", self.kind());
            return Ok(None);
        }

        let fetched = match self {
            CredentialSource::SecretsStore { secret_id, client } => {
                let client = client.as_ref().ok_or(ResolveError::SourceUnavailable {
                    kind: SourceKind::SecretsStore,
                })?;
                client.get_secret_value(secret_id).await
            }
            CredentialSource::ParameterStore { parameter_name, client } => {
                let client = client.as_ref().ok_or(ResolveError::SourceUnavailable {
                    kind: SourceKind::ParameterStore,
                })?;
                client.get_parameter(parameter_name, true).await
            }
            CredentialSource::StaticConfig { value } => Ok(Some(value.to_owned())),
        };

        match fetched {
            Ok(Some(value)) if !value.trim().is_empty() => Ok(Some(value)),
            Ok(_) => Err(self.fetch_error("value is empty".to_owned())),
            Err(err) => Err(self.fetch_error(format!("{:#}", err))),
        }
    }

    fn fetch_error(&self, reason: String) -> ResolveError {
        ResolveError::Fetch {
            kind: self.kind(),
            key: self.display_key().to_owned(),
            reason,
        }
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::SecretsStore { secret_id, client } => f
                .debug_struct("SecretsStore")
                .field("secret_id", secret_id)
                .field("client", &client.is_some())
                .finish(),
            CredentialSource::ParameterStore { parameter_name, client } => f
                .debug_struct("ParameterStore")
                .field("parameter_name", parameter_name)
                .field("client", &client.is_some())
                .finish(),
            CredentialSource::StaticConfig { .. } => f
                .debug_struct("StaticConfig")
                .field("value", &self.display_key())
                .finish(),
        }
    }
}
