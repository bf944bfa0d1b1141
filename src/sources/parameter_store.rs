use anyhow::{Context, Result};
use async_trait::async_trait;

use super::ParameterStoreClient;

/// Reads the auth token from AWS SSM Parameter Store.
///
/// `SecureString` parameters need `ssm:GetParameter` plus decrypt permission on
/// the KMS key protecting them.
pub struct AwsParameterStore {
    client: aws_sdk_ssm::Client,
}

impl AwsParameterStore {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ssm::Client::new(config),
        }
    }
}

#[async_trait]
impl ParameterStoreClient for AwsParameterStore {
    async fn get_parameter(&self, name: &str, with_decryption: bool) -> Result<Option<String>> {
        let resp = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(with_decryption)
            .send()
            .await
            .with_context(|| format!("SSM GetParameter failed for '{name}'"))?;

        Ok(resp
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_owned))
    }
}
