use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Source metrics
    pub source_resolutions: IntCounterVec,
    pub source_resolution_failures: IntCounterVec,
    pub source_resolution_duration: HistogramVec,

    // Cache metrics
    pub cache_invalidations: IntCounter,

    // Authorization
    pub authorizations: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokenguard".into()), None)
            .expect("valid metrics namespace");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Source
            source_resolutions: IntCounterVec::new(Opts::new("source_resolutions_total", "Token resolution attempts by source"), &["source"]).expect("metric"),
            source_resolution_failures: IntCounterVec::new(Opts::new("source_resolution_failures_total", "Token resolution failures by reason"), &["source", "reason"]).expect("metric"),
            source_resolution_duration: HistogramVec::new(HistogramOpts::new("source_resolution_duration_seconds", "Token resolution duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["source"]).expect("metric"),

            // Cache
            cache_invalidations: IntCounter::new("cache_invalidations_total", "Cached token invalidations").expect("metric"),

            // Authorization
            authorizations: IntCounterVec::new(Opts::new("authorizations_total", "Authorization decisions by outcome"), &["outcome"]).expect("metric"),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").expect("metric"),
            up: IntGauge::new("up", "1 if service is serving").expect("metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.source_resolutions.clone())).expect("register");
        reg.register(Box::new(metrics.source_resolution_failures.clone())).expect("register");
        reg.register(Box::new(metrics.source_resolution_duration.clone())).expect("register");
        reg.register(Box::new(metrics.cache_invalidations.clone())).expect("register");
        reg.register(Box::new(metrics.authorizations.clone())).expect("register");
        reg.register(Box::new(metrics.config_validation_errors.clone())).expect("register");
        reg.register(Box::new(metrics.up.clone())).expect("register");

        metrics
    }
}
