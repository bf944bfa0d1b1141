use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::cache::token_cache::TokenCache;
use crate::errors::AuthError;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::REDACTED;

/// Checks presented credentials against the shared token.
///
/// A mismatch triggers exactly one invalidate-and-refetch before rejecting,
/// which lets a request carrying a freshly rotated secret through.
#[derive(Clone)]
pub struct Authorizer {
    cache: Arc<TokenCache>,
}

impl Authorizer {
    pub fn new(cache: Arc<TokenCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    pub async fn assert_authorized(&self, presented: &str) -> Result<(), AuthError> {
        let outcome = self.authorize(presented).await;
        let label = match &outcome {
            Ok(()) => "authorized",
            Err(err) => err.as_str(),
        };
        get_metrics()
            .await
            .authorizations
            .with_label_values(&[label])
            .inc();
        outcome
    }

    /// Drops the cached token; the next request resolves it again.
    pub async fn refresh(&self) {
        self.cache.invalidate().await;
    }

    async fn authorize(&self, presented: &str) -> Result<(), AuthError> {
        if presented.trim().is_empty() {
            warn!("unauthorized request denied: credential missing");
            return Err(AuthError::Unauthorized);
        }

        let snapshot = self.cache.get().await.map_err(|err| {
            error!("auth token unavailable, rejecting request: {}", err);
            AuthError::ServiceUnavailable
        })?;
        if snapshot.matches(presented) {
            return Ok(());
        }

        debug!(
            "credential mismatch against token from {}, refreshing once",
            snapshot.source
        );
        self.cache.invalidate().await;

        let refreshed = self.cache.get().await.map_err(|err| {
            error!("auth token refresh failed, rejecting request: {}", err);
            AuthError::ServiceUnavailable
        })?;
        if refreshed.matches(presented) {
            info!("credential accepted after auth token refresh from {}", refreshed.source);
            return Ok(());
        }

        warn!(
            "unauthorized request denied: expected token {}, received {}",
            REDACTED, REDACTED
        );
        Err(AuthError::Unauthorized)
    }
}
