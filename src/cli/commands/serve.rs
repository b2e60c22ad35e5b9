//! Implementation of the `serve` command.

use anyhow::{anyhow, Result};
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::ports::SystemClock;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::http::{AppState, HttpServer};
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::infrastructure::setup::build_catalog;
use crate::services::{CacheWarmer, RefreshWindowPolicy};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port
    #[arg(long, short)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = ConfigLoader::load_from(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    let catalog = Arc::new(build_catalog(&config)?);

    let warmer = config.server.warm_cache.then(|| {
        CacheWarmer::new(
            Arc::clone(&catalog),
            RefreshWindowPolicy::from(config.refresh),
            Arc::new(SystemClock),
            config.server.warm_limit,
        )
        .spawn()
    });

    let server = HttpServer::new(AppState::new(catalog), config.server.clone());
    let result = server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|err| anyhow!("HTTP server failed: {err}"));

    if let Some(warmer) = warmer {
        warmer.abort();
    }
    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => warn!(error = %err, "failed to listen for shutdown signal"),
    }
}
