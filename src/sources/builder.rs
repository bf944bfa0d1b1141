use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::{debug, info};

use crate::config::credentials::{has_text, AwsConfig, CredentialsConfig};
use crate::sources::parameter_store::AwsParameterStore;
use crate::sources::secrets_store::AwsSecretsStore;
use crate::sources::source_chain::SourceChain;
use crate::sources::static_value::prepare_static_value;
use crate::sources::{ParameterStoreClient, SecretStoreClient};

/// Wire the source chain from configuration. A remote client is constructed
/// only when its identifier is configured.
pub async fn build_source_chain(credentials: &CredentialsConfig) -> Result<SourceChain> {
    let use_secrets = credentials.secrets_store_configured();
    let use_parameters = credentials.parameter_store_configured();

    let sdk_config = if use_secrets || use_parameters {
        Some(load_sdk_config(&credentials.aws).await)
    } else {
        debug!("no AWS source configured, skipping AWS client setup");
        None
    };

    let secrets_client: Option<Arc<dyn SecretStoreClient>> = match &sdk_config {
        Some(config) if use_secrets => {
            info!("secrets store client enabled for '{}'", credentials.secrets_store.secret_id);
            Some(Arc::new(AwsSecretsStore::new(config)))
        }
        _ => None,
    };

    let parameter_client: Option<Arc<dyn ParameterStoreClient>> = match &sdk_config {
        Some(config) if use_parameters => {
            info!(
                "parameter store client enabled for '{}'",
                credentials.parameter_store.parameter_name
            );
            Some(Arc::new(AwsParameterStore::new(config)))
        }
        _ => None,
    };

    let static_token = prepare_static_value(credentials.static_token.as_ref()).await?;

    Ok(SourceChain::builder()
        .secrets_store(credentials.secrets_store.secret_id.trim(), secrets_client)
        .parameter_store(credentials.parameter_store.parameter_name.trim(), parameter_client)
        .static_config(static_token)
        .build())
}

async fn load_sdk_config(aws: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = aws.region.as_deref().filter(|r| has_text(r)) {
        loader = loader.region(Region::new(region.to_owned()));
    }
    if let Some(endpoint_url) = aws.endpoint_url.as_deref().filter(|u| has_text(u)) {
        debug!("aws endpoint override: {}", endpoint_url);
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}
