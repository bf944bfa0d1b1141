//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks server address, route paths (absolute, no collisions), auth
//!   header name, health timeout and logging level
//! - A config without any credential source is accepted with a warning: the
//!   service runs and reports itself DOWN until an operator fixes it

use std::collections::HashSet;

use axum::http::HeaderName;
use tracing::{error, info, warn};

use crate::config::credentials::{has_text, has_text_opt, CredentialsConfig, ServiceConfig, StaticTokenValue};
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{AUTH_REFRESH_PATH, AUTH_VERIFY_PATH};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_credentials(&cfg.credentials, &mut errors);

    if errors.is_empty() {
        info!("config is valid");
        return Ok(());
    }

    let metrics = get_metrics().await;
    for err in &errors {
        error!("config: {}", err);
        metrics.config_validation_errors.inc();
    }
    Err(errors)
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    let server = &settings.server;
    if server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    match server.port.parse::<u16>() {
        Ok(0) | Err(_) => errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            server.port
        )),
        Ok(_) => {}
    }
    if HeaderName::from_bytes(server.auth_header.as_bytes()).is_err() {
        errors.push(format!(
            "settings.server.auth_header '{}' is not a valid header name",
            server.auth_header
        ));
    }

    if settings.health.timeout_ms == 0 {
        errors.push("settings.health.timeout_ms must be greater than 0".to_string());
    }

    let mut paths: Vec<(&str, &str)> = vec![
        ("settings.health.path", settings.health.path.as_str()),
        ("auth verify", AUTH_VERIFY_PATH),
        ("auth refresh", AUTH_REFRESH_PATH),
    ];
    if settings.metrics.is_enabled {
        paths.push(("settings.metrics.path", settings.metrics.path.as_str()));
    }
    let mut seen = HashSet::new();
    for (name, path) in paths {
        if !path.starts_with('/') {
            errors.push(format!("{} '{}' must start with '/'", name, path));
        }
        if !seen.insert(path) {
            errors.push(format!("{} '{}' collides with another route", name, path));
        }
    }

    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    if let Some(region) = &credentials.aws.region {
        if region.trim() != region {
            errors.push(format!(
                "credentials.aws.region '{}' must not contain surrounding whitespace",
                region
            ));
        }
    }

    match &credentials.static_token {
        Some(StaticTokenValue::FromEnv { from_env }) if !has_text(from_env) => {
            errors.push("credentials.static_token.from_env must name a variable".to_string());
        }
        Some(StaticTokenValue::FromFile { path }) if !has_text(path) => {
            errors.push("credentials.static_token.path must not be empty".to_string());
        }
        _ => {}
    }

    if !credentials.any_source_configured() {
        warn!("no credential source configured; every authorization will be rejected as unavailable");
    }

    if has_text_opt(&credentials.aws.endpoint_url)
        && !credentials.secrets_store_configured()
        && !credentials.parameter_store_configured()
    {
        warn!("credentials.aws.endpoint_url is set but no AWS source is configured");
    }
}
