#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use crate::auth::Authorizer;
    use crate::cache::token::TokenMetadata;
    use crate::cache::token_cache::TokenCache;
    use crate::config::settings::SettingsConfig;
    use crate::observability::health::{HealthReport, HealthStatus};
    use crate::observability::metrics::get_metrics;
    use crate::server::server::{router, AppState};
    use crate::sources::SourceKind;
    use crate::tests::common::{build_reqwest_client, spawn_axum, CountingResolver};

    const SETTINGS: &str = r#"
server:
  host: 127.0.0.1
  port: "8080"
metrics:
  is_enabled: true
  path: /metrics
"#;

    async fn serve(resolver: &Arc<CountingResolver>) -> (tokio::task::JoinHandle<()>, String, Authorizer) {
        let settings: SettingsConfig = serde_yaml::from_str(SETTINGS).unwrap();
        let authorizer = Authorizer::new(Arc::new(TokenCache::new(resolver.clone())));
        let state = AppState::new(get_metrics().await, authorizer.clone(), &settings.server.auth_header)
            .unwrap();
        let (handle, addr) = spawn_axum(router(state, &settings)).await;
        (handle, format!("http://{}", addr), authorizer)
    }

    #[tokio::test]
    async fn health_reports_up_with_provenance() {
        let resolver = Arc::new(CountingResolver::fixed("secret-123"));
        let (handle, base, _) = serve(&resolver).await;

        let resp = build_reqwest_client()
            .get(format!("{base}/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), StatusCode::OK.as_u16());

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "UP");
        assert_eq!(body["source"], "SECRETS_STORE");
        assert!(body["fetchedAt"].is_string());
        assert!(!body.to_string().contains("secret-123"));

        handle.abort();
    }

    #[tokio::test]
    async fn health_reports_down_when_store_is_broken() {
        let resolver = Arc::new(CountingResolver::failing());
        let (handle, base, _) = serve(&resolver).await;

        let resp = build_reqwest_client()
            .get(format!("{base}/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 503);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"status": "DOWN", "error": "UNAVAILABLE"}));

        handle.abort();
    }

    #[tokio::test]
    async fn verify_maps_outcomes_to_status_codes() {
        let resolver = Arc::new(CountingResolver::fixed("secret-123"));
        let (handle, base, _) = serve(&resolver).await;
        let client = build_reqwest_client();
        let url = format!("{base}/auth/verify");

        let missing = client.post(&url).send().await.unwrap();
        assert_eq!(missing.status().as_u16(), 401);
        assert_eq!(resolver.calls(), 0);

        let wrong = client.post(&url).header("X-Demo-Auth", "wrong").send().await.unwrap();
        assert_eq!(wrong.status().as_u16(), 401);
        assert_eq!(wrong.text().await.unwrap(), "Unauthorized");

        let right = client
            .post(&url)
            .header("X-Demo-Auth", "secret-123")
            .send()
            .await
            .unwrap();
        assert_eq!(right.status().as_u16(), 204);

        handle.abort();
    }

    #[tokio::test]
    async fn verify_is_unavailable_when_store_is_broken() {
        let resolver = Arc::new(CountingResolver::failing());
        let (handle, base, _) = serve(&resolver).await;

        let resp = build_reqwest_client()
            .post(format!("{base}/auth/verify"))
            .header("X-Demo-Auth", "anything")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 503);
        assert_eq!(resp.text().await.unwrap(), "Service Unavailable");

        handle.abort();
    }

    #[tokio::test]
    async fn refresh_requires_authorization_and_clears_cache() {
        let resolver = Arc::new(CountingResolver::fixed("secret-123"));
        let (handle, base, authorizer) = serve(&resolver).await;
        let client = build_reqwest_client();
        let url = format!("{base}/auth/refresh");

        let denied = client.post(&url).header("X-Demo-Auth", "nope").send().await.unwrap();
        assert_eq!(denied.status().as_u16(), 401);
        assert!(authorizer.cache().snapshot_if_cached().await.is_some());

        let accepted = client
            .post(&url)
            .header("X-Demo-Auth", "secret-123")
            .send()
            .await
            .unwrap();
        assert_eq!(accepted.status().as_u16(), 204);
        assert!(authorizer.cache().snapshot_if_cached().await.is_none());

        handle.abort();
    }

    #[tokio::test]
    async fn metrics_are_exposed_when_enabled() {
        let resolver = Arc::new(CountingResolver::fixed("secret-123"));
        let (handle, base, authorizer) = serve(&resolver).await;
        authorizer.assert_authorized("secret-123").await.unwrap();

        let resp = build_reqwest_client()
            .get(format!("{base}/metrics"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let body = resp.text().await.unwrap();
        assert!(body.contains("tokenguard_authorizations_total"));

        handle.abort();
    }

    #[test]
    fn health_report_serialization() {
        let fetched_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let up = HealthReport::from_metadata(Some(TokenMetadata {
            source: SourceKind::StaticConfig,
            fetched_at,
        }));
        assert_eq!(up.status, HealthStatus::Up);
        assert_eq!(
            serde_json::to_value(&up).unwrap(),
            json!({"status": "UP", "source": "STATIC_CONFIG", "fetchedAt": "2024-01-01T00:00:00Z"})
        );

        let down = HealthReport::from_metadata(None);
        assert_eq!(down.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
