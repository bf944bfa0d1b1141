use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::cache::token::TokenMetadata;
use crate::server::server::AppState;
use crate::sources::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Auth token health from the cached snapshot provenance. An empty cache is
/// populated first, bounded by the health timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl HealthReport {
    pub fn from_metadata(metadata: Option<TokenMetadata>) -> Self {
        match metadata {
            Some(metadata) => Self {
                status: HealthStatus::Up,
                source: Some(metadata.source),
                fetched_at: Some(metadata.fetched_at),
                error: None,
            },
            None => {
                warn!("auth token metadata unavailable; reporting health DOWN");
                Self {
                    status: HealthStatus::Down,
                    source: None,
                    fetched_at: None,
                    error: Some("UNAVAILABLE"),
                }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

pub async fn get_health(State(state): State<AppState>) -> Response {
    let report = HealthReport::from_metadata(state.cache.metadata().await);
    (report.status_code(), Json(report)).into_response()
}
