use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::config::credentials::ServiceConfig;
use crate::config::proc_loader::file_to_config;

pub async fn run(config_path: &str) -> Result<ServiceConfig> {
    let path = Path::new(config_path);
    let service_config = file_to_config(path)
        .await
        .map_err(|e| anyhow!("Invalid config {}: {}", config_path, e))?;
    info!("config loaded from {}", config_path);
    Ok(service_config)
}
