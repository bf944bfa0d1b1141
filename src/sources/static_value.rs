use anyhow::{anyhow, Result};
use tracing::debug;

use crate::config::credentials::StaticTokenValue;

/// Reads the static token once at startup. An unset environment variable
/// leaves the source unconfigured; an unreadable file is a startup error.
pub async fn prepare_static_value(value: Option<&StaticTokenValue>) -> Result<String> {
    match value {
        None => Ok(String::new()),
        Some(StaticTokenValue::Literal { value }) => Ok(value.to_owned()),
        Some(StaticTokenValue::FromEnv { from_env }) => match std::env::var(from_env) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("static token env '{}' unavailable: {}", from_env, err);
                Ok(String::new())
            }
        },
        Some(StaticTokenValue::FromFile { path }) => tokio::fs::read_to_string(path)
            .await
            .map(|content| content.trim().to_string())
            .map_err(|err| anyhow!("cannot read static token file '{}': {}", path, err)),
    }
}
