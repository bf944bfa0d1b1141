use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderName;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tracing::info;

use crate::auth::Authorizer;
use crate::cache::token_cache::TokenCache;
use crate::config::settings::SettingsConfig;
use crate::observability::health::get_health;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::auth_routes::{refresh, require_authorization, verify};
use crate::utils::constants::{AUTH_REFRESH_PATH, AUTH_VERIFY_PATH};

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub cache: Arc<TokenCache>,
    pub authorizer: Authorizer,
    pub auth_header: HeaderName,
}

impl AppState {
    pub fn new(metrics: &Metrics, authorizer: Authorizer, auth_header: &str) -> Result<Self> {
        let auth_header = HeaderName::from_bytes(auth_header.as_bytes())
            .with_context(|| format!("invalid auth header name '{}'", auth_header))?;
        Ok(Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            cache: authorizer.cache().clone(),
            authorizer,
            auth_header,
        })
    }
}

/// Health and metrics are open; the auth routes sit behind the authorizer.
pub fn router(state: AppState, settings_config: &SettingsConfig) -> Router {
    let protected = Router::new()
        .route(AUTH_VERIFY_PATH, post(verify))
        .route(AUTH_REFRESH_PATH, post(refresh))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authorization,
        ));

    Router::new()
        .route(settings_config.health.path.as_str(), get(get_health))
        .merge(state.metrics_state.router(&settings_config.metrics))
        .merge(protected)
        .with_state(state)
}

pub async fn start(settings_config: &SettingsConfig, authorizer: Authorizer) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, authorizer, &settings_config.server.auth_header)?;
    let app = router(state, settings_config);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port))
        .await
        .with_context(|| format!("cannot bind {}:{}", bind_addr, port))?;
    info!("listening on {}:{}", bind_addr, port);

    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;
    metrics.up.set(0);
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
