use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use token_guard::auth::Authorizer;
use token_guard::cache::token_cache::TokenCache;
use token_guard::server;
use token_guard::sources::builder::build_source_chain;
use token_guard::utils::config_loader;
use token_guard::utils::constants::DEFAULT_CONFIG_PATH;
use token_guard::utils::logging::{self, LogLevel};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, start logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Wire credential sources (AWS clients only where configured)
    // -------------------------------

    let chain = build_source_chain(&service_config.credentials).await?;
    if !chain.any_configured() {
        warn!("no credential source configured; requests will be rejected until configuration is fixed");
    }

    // -------------------------------
    // 3. Token cache and authorizer
    // -------------------------------

    let health_timeout = Duration::from_millis(service_config.settings.health.timeout_ms);
    let cache = Arc::new(TokenCache::new(Arc::new(chain)).with_metadata_timeout(health_timeout));
    let authorizer = Authorizer::new(cache);

    // -------------------------------
    // 4. Start http server (health, metrics, auth routes)
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config.settings, authorizer).await?;

    Ok(())
}
