//! Tutorial Management API server
//!
//! Serves CRUD endpoints for tutorials held in memory, plus an OpenAPI
//! document at `/v3/api-docs`.
//!
//! Usage:
//!   tutorial-api --port 8080 --cors-origin http://localhost:3000
//!
//! Nothing is persisted; all tutorials are lost when the process exits.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tutorial_api::{ApiConfig, build_router, config::DEFAULT_CORS_ORIGIN, openapi};
use tutorial_store::TutorialStore;

#[derive(Parser, Debug)]
#[command(name = "tutorial-api")]
#[command(about = "Tutorial Management API server")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// HTTP port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Origin allowed to make cross-origin requests (repeatable)
    #[arg(long = "cors-origin", default_value = DEFAULT_CORS_ORIGIN)]
    cors_origins: Vec<String>,

    /// Development server URL advertised in the API document
    #[arg(long)]
    dev_url: Option<String>,

    /// Production server URL advertised in the API document
    #[arg(long)]
    prod_url: Option<String>,

    /// Enable verbose debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> ApiConfig {
        let mut config = ApiConfig::new(SocketAddr::new(self.host, self.port))
            .with_cors_origins(self.cors_origins);
        if let Some(url) = self.dev_url {
            config = config.with_dev_url(url);
        }
        if let Some(url) = self.prod_url {
            config = config.with_prod_url(url);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.into_config();
    info!("Tutorial API starting...");

    let store = Arc::new(TutorialStore::new());
    let app = build_router(store, &config).context("Failed to build router")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    let local_addr = listener.local_addr().context("Failed to read local address")?;

    info!(
        addr = %local_addr,
        cors_origins = ?config.cors_origins,
        "HTTP API listening"
    );
    info!("API document: {}{}", config.dev_url, openapi::API_DOCS);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Tutorial API stopped");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
