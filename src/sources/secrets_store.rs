use anyhow::{Context, Result};
use async_trait::async_trait;

use super::SecretStoreClient;

/// Reads the auth token from AWS Secrets Manager.
///
/// Only `SecretString` secrets are supported; a binary-only secret resolves to
/// no value.
pub struct AwsSecretsStore {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretsStore {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_secretsmanager::Client::new(config),
        }
    }
}

#[async_trait]
impl SecretStoreClient for AwsSecretsStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .with_context(|| format!("Secrets Manager GetSecretValue failed for '{secret_id}'"))?;

        Ok(resp.secret_string().map(str::to_owned))
    }
}
