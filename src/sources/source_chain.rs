use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{error, info};

use crate::cache::token::TokenSnapshot;
use crate::errors::ResolveError;
use crate::observability::metrics::get_metrics;
use crate::sources::{
    CredentialSource, ParameterStoreClient, ResolveToken, SecretStoreClient,
};

/// Ordered credential sources. The first configured source wins; a failure of
/// that source is final and never falls through to a lower priority one.
#[derive(Debug, Clone)]
pub struct SourceChain {
    sources: Vec<CredentialSource>,
}

impl SourceChain {
    /// Sources are reordered by [`crate::sources::SourceKind`] priority.
    pub fn new(mut sources: Vec<CredentialSource>) -> Self {
        sources.sort_by_key(|source| source.kind());
        Self { sources }
    }

    pub fn builder() -> SourceChainBuilder {
        SourceChainBuilder::default()
    }

    pub fn sources(&self) -> &[CredentialSource] {
        &self.sources
    }

    /// True when at least one source has a non-blank key.
    pub fn any_configured(&self) -> bool {
        self.sources.iter().any(CredentialSource::is_configured)
    }
}

#[async_trait]
impl ResolveToken for SourceChain {
    async fn resolve(&self) -> Result<TokenSnapshot, ResolveError> {
        let metrics = get_metrics().await;

        for source in &self.sources {
            if !source.is_configured() {
                continue;
            }

            let kind = source.kind();
            let start = Instant::now();
            metrics
                .source_resolutions
                .with_label_values(&[kind.as_str()])
                .inc();

            let resolved = source.resolve().await;
            metrics
                .source_resolution_duration
                .with_label_values(&[kind.as_str()])
                .observe(start.elapsed().as_secs_f64());

            let err = match resolved {
                Ok(Some(token)) => {
                    info!("auth token resolved from {} '{}'", kind, source.display_key());
                    return Ok(TokenSnapshot::new(token, kind));
                }
                Ok(None) => ResolveError::Configuration,
                Err(err) => err,
            };

            error!("auth token resolution failed: {}", err);
            metrics
                .source_resolution_failures
                .with_label_values(&[kind.as_str(), err.reason()])
                .inc();
            return Err(err);
        }

        error!("{}", ResolveError::Configuration);
        metrics
            .source_resolution_failures
            .with_label_values(&["NONE", ResolveError::Configuration.reason()])
            .inc();
        Err(ResolveError::Configuration)
    }
}

/// Collects the three sources from configuration, in any order.
#[derive(Default)]
pub struct SourceChainBuilder {
    sources: Vec<CredentialSource>,
}

impl SourceChainBuilder {
    pub fn secrets_store(
        mut self,
        secret_id: impl Into<String>,
        client: Option<Arc<dyn SecretStoreClient>>,
    ) -> Self {
        self.sources.push(CredentialSource::SecretsStore {
            secret_id: secret_id.into(),
            client,
        });
        self
    }

    pub fn parameter_store(
        mut self,
        parameter_name: impl Into<String>,
        client: Option<Arc<dyn ParameterStoreClient>>,
    ) -> Self {
        self.sources.push(CredentialSource::ParameterStore {
            parameter_name: parameter_name.into(),
            client,
        });
        self
    }

    pub fn static_config(mut self, value: impl Into<String>) -> Self {
        self.sources.push(CredentialSource::StaticConfig {
            value: value.into(),
        });
        self
    }

    pub fn build(self) -> SourceChain {
        SourceChain::new(self.sources)
    }
}
