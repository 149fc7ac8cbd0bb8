mod cache;
mod config;
mod dispatch;
mod error;
mod format;
mod server;
mod tavily;
mod tools;

use anyhow::Result;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::{ResultCache, SystemClock};
use crate::config::Config;
use crate::server::TavilySearchServer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Tavily Search MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    tracing::debug!(
        "Configuration loaded: api_url={} api_key={}",
        config.api_url,
        config.mask_api_key()
    );

    let cache = Arc::new(ResultCache::new(Arc::new(SystemClock)));
    let server = TavilySearchServer::new(&config, cache)?;
    let service = server.serve(stdio()).await?;

    tokio::select! {
        result = service.waiting() => {
            if let Err(e) = result {
                tracing::warn!("Service ended with error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Tavily Search MCP Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
