use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use growatt_plant::cache::token_cache::TokenCache;
use growatt_plant::observability::error_log::TracingErrorLog;
use growatt_plant::server;
use growatt_plant::utils::config_loader;
use growatt_plant::utils::constants::DEFAULT_CONFIG_PATH;
use growatt_plant::utils::logging;
use growatt_plant::utils::logging::LogLevel;
use growatt_plant::OssClient;
use anyhow::Result;
use tracing::info;

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
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 2. Create request client
    // -------------------------------

    let http = Client::builder()
        .timeout(Duration::from_millis(service_config.settings.http.timeout_ms))
        .build()?;

    // -------------------------------
    // 3. Wire token store, error log and vendor client
    // -------------------------------

    let client = OssClient::new(
        http,
        service_config.credentials.clone(),
        Arc::new(TokenCache::new()),
        Arc::new(TracingErrorLog),
    );

    // -------------------------------
    // 4. Serve lookups
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config.settings, Arc::new(client)).await
}
