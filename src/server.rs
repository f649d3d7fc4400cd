//! Dev server initialization and runtime setup.
//!
//! Loads the dev config, builds the proxy table for the current mode and runs
//! the Axum server until Ctrl-C.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

use crate::config::Config;
use crate::devserver::{DevConfig, ProxyTable};
use crate::routes::app_router;
use crate::state::DevState;

/// Builds the proxy table: the configured rules in development, nothing in
/// production where the backend serves the built assets itself.
pub fn proxy_table(config: &Config, dev_config: &DevConfig) -> ProxyTable {
    if !config.app_env.is_development() {
        tracing::info!("Production mode: proxy disabled");
        return ProxyTable::disabled();
    }

    let table = ProxyTable::from_config(dev_config);
    for rule in table.rules() {
        tracing::info!("Proxy {} -> {}", rule.prefix, rule.target);
    }
    table
}

/// Runs the dev server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The dev config file cannot be loaded or is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let dev_config = DevConfig::load_or_default(config.dev_config_path.as_deref())
        .context("Failed to load dev config")?;

    let plugins: Vec<&str> = dev_config.plugins.iter().map(|p| p.name()).collect();
    tracing::info!("Build plugins: {}", plugins.join(", "));

    let proxy = proxy_table(&config, &dev_config);
    let state = DevState::new(proxy, Duration::from_secs(config.http_timeout_seconds));

    let app = app_router(state, &config.static_dir);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
