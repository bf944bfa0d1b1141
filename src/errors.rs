use thiserror::Error;

use crate::sources::SourceKind;

/// Failure to produce a token snapshot from the configured sources.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// None of the secrets store, parameter store or static token is configured.
    #[error("no auth token configured via secrets store, parameter store or static config")]
    Configuration,

    /// The source key is configured but its client was never constructed.
    #[error("{kind} is configured but its client is not available")]
    SourceUnavailable { kind: SourceKind },

    /// The selected source failed or returned an empty value.
    #[error("failed to fetch auth token from {kind} '{key}': {reason}")]
    Fetch {
        kind: SourceKind,
        key: String,
        reason: String,
    },
}

impl ResolveError {
    /// Short label used as the `reason` metric dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            ResolveError::Configuration => "configuration",
            ResolveError::SourceUnavailable { .. } => "source_unavailable",
            ResolveError::Fetch { .. } => "fetch",
        }
    }
}

/// Rejected authorization. The underlying cause is logged, never returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("auth token store unavailable")]
    ServiceUnavailable,
}

impl AuthError {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthError::Unauthorized => "unauthorized",
            AuthError::ServiceUnavailable => "service_unavailable",
        }
    }
}
