use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::errors::AuthError;
use crate::server::server::AppState;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            AuthError::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response()
            }
        }
    }
}

/// Route layer guarding mutating endpoints. A missing header is treated as an
/// empty credential.
pub async fn require_authorization(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(&state.auth_header)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_default();

    match state.authorizer.assert_authorized(&presented).await {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

pub async fn verify() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn refresh(State(state): State<AppState>) -> StatusCode {
    state.authorizer.refresh().await;
    StatusCode::NO_CONTENT
}
