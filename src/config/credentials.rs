use serde::Deserialize;

use crate::config::settings::SettingsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// ================================
/// Credential sources
/// ================================
/// Every key is optional. Resolution priority is fixed:
/// secrets store, then parameter store, then static token.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub secrets_store: SecretsStoreConfig,
    #[serde(default)]
    pub parameter_store: ParameterStoreConfig,
    pub static_token: Option<StaticTokenValue>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AwsConfig {
    pub region: Option<String>,
    /// e.g. a localstack endpoint
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SecretsStoreConfig {
    #[serde(default)]
    pub secret_id: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ParameterStoreConfig {
    #[serde(default)]
    pub parameter_name: String,
}

/// Static token value sources
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum StaticTokenValue {
    Literal { value: String },
    FromEnv { from_env: String },
    FromFile { path: String },
}

pub fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn has_text_opt(value: &Option<String>) -> bool {
    value.as_deref().map(has_text).unwrap_or(false)
}

impl CredentialsConfig {
    pub fn secrets_store_configured(&self) -> bool {
        has_text(&self.secrets_store.secret_id)
    }

    pub fn parameter_store_configured(&self) -> bool {
        has_text(&self.parameter_store.parameter_name)
    }

    pub fn static_token_configured(&self) -> bool {
        self.static_token
            .as_ref()
            .map(StaticTokenValue::is_configured)
            .unwrap_or(false)
    }

    pub fn any_source_configured(&self) -> bool {
        self.secrets_store_configured()
            || self.parameter_store_configured()
            || self.static_token_configured()
    }
}

impl StaticTokenValue {
    /// An unset or blank env var leaves the static source unconfigured, the
    /// same way it is treated when the token is read at startup.
    pub fn is_configured(&self) -> bool {
        match self {
            StaticTokenValue::Literal { value } => has_text(value),
            StaticTokenValue::FromEnv { from_env } => std::env::var(from_env)
                .map(|value| has_text(&value))
                .unwrap_or(false),
            StaticTokenValue::FromFile { path } => has_text(path),
        }
    }
}
