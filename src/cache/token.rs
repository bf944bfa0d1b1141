use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::sources::SourceKind;

/// Resolved token plus provenance. Never mutated, replaced wholesale on refresh.
#[derive(Debug)]
pub struct TokenSnapshot {
    token: SecretString,
    pub source: SourceKind,
    pub fetched_at: DateTime<Utc>,
}

impl TokenSnapshot {
    pub fn new(token: String, source: SourceKind) -> Self {
        Self {
            token: SecretString::from(token),
            source,
            fetched_at: Utc::now(),
        }
    }

    // plain string equality, not constant-time
    pub fn matches(&self, presented: &str) -> bool {
        self.token.expose_secret() == presented
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            source: self.source,
            fetched_at: self.fetched_at,
        }
    }
}

/// Non-secret part of a snapshot, for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub source: SourceKind,
    pub fetched_at: DateTime<Utc>,
}
