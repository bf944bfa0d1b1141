use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::token::{TokenMetadata, TokenSnapshot};
use crate::errors::ResolveError;
use crate::observability::metrics::get_metrics;
use crate::sources::ResolveToken;
use crate::utils::constants::DEFAULT_HEALTH_TIMEOUT_MS;

/// Single-slot token cache, populated on demand.
///
/// Readers take the shared `slot` lock only. Population and invalidation are
/// serialized by `populate`, so concurrent misses collapse into one call to
/// the resolver and an invalidation never lands in the middle of a
/// population. Failures are not cached.
pub struct TokenCache {
    resolver: Arc<dyn ResolveToken>,
    slot: RwLock<Option<Arc<TokenSnapshot>>>,
    populate: Mutex<()>,
    metadata_timeout: Duration,
}

impl TokenCache {
    pub fn new(resolver: Arc<dyn ResolveToken>) -> Self {
        Self {
            resolver,
            slot: RwLock::new(None),
            populate: Mutex::new(()),
            metadata_timeout: Duration::from_millis(DEFAULT_HEALTH_TIMEOUT_MS),
        }
    }

    pub fn with_metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = timeout;
        self
    }

    /// Cached snapshot, resolving it first if the slot is empty.
    pub async fn get(&self) -> Result<Arc<TokenSnapshot>, ResolveError> {
        if let Some(snapshot) = self.snapshot_if_cached().await {
            return Ok(snapshot);
        }

        let _guard = self.populate.lock().await;

        // another caller may have populated the slot while we waited
        if let Some(snapshot) = self.snapshot_if_cached().await {
            debug!("auth token populated by a concurrent caller");
            return Ok(snapshot);
        }

        let snapshot = Arc::new(self.resolver.resolve().await?);
        *self.slot.write().await = Some(snapshot.clone());
        info!(
            "auth token loaded from {} at {}",
            snapshot.source,
            snapshot.fetched_at.to_rfc3339()
        );
        Ok(snapshot)
    }

    /// Clears the slot. The next `get` resolves again.
    pub async fn invalidate(&self) {
        let _guard = self.populate.lock().await;
        if self.slot.write().await.take().is_some() {
            get_metrics().await.cache_invalidations.inc();
            info!("auth token cache invalidated");
        }
    }

    /// Current snapshot without triggering a resolution.
    pub async fn snapshot_if_cached(&self) -> Option<Arc<TokenSnapshot>> {
        self.slot.read().await.clone()
    }

    /// Best-effort provenance for health reporting. Never returns an error and
    /// never waits longer than the configured timeout.
    ///
    /// A population started here runs in its own task, so it still completes
    /// and fills the slot after the caller stops waiting.
    pub async fn metadata(self: &Arc<Self>) -> Option<TokenMetadata> {
        if let Some(snapshot) = self.snapshot_if_cached().await {
            return Some(snapshot.metadata());
        }

        let cache = Arc::clone(self);
        let population = tokio::spawn(async move { cache.get().await });

        match tokio::time::timeout(self.metadata_timeout, population).await {
            Ok(Ok(Ok(snapshot))) => Some(snapshot.metadata()),
            Ok(Ok(Err(err))) => {
                warn!("auth token metadata unavailable: {}", err);
                None
            }
            Ok(Err(err)) => {
                warn!("auth token metadata unavailable: population task failed: {}", err);
                None
            }
            Err(_) => {
                warn!(
                    "auth token metadata unavailable: resolution exceeded {:?}",
                    self.metadata_timeout
                );
                None
            }
        }
    }
}
