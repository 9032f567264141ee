//! Authenticating single-target reverse proxy.
//!
//! Forwards every matched request to one fixed upstream, after an
//! authentication gate has cleared it.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                 AUTHGATE PROXY                │
//!                        │                                               │
//!   Client Request       │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────────┼─▶│  http   │──▶│ director │──▶│ auth gate │  │
//!                        │  │ server  │   │ (rewrite)│   └─────┬─────┘  │
//!                        │  └─────────┘   └──────────┘    pass │ deny   │
//!                        │                                     │  │     │
//!                        │                                     ▼  │     │
//!   Client Response      │  ┌──────────────┐          ┌──────────┐│     │
//!   ◀────────────────────┼──│   response   │◀─────────│transport ││     │ ──▶ Upstream
//!                        │  │    writer    │◀── 401 ──└──────────┘┘     │
//!                        │  └──────────────┘                            │
//!                        │                                               │
//!                        │  Cross-cutting: config, observability,        │
//!                        │  lifecycle (graceful shutdown)                │
//!                        └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate::config::{load_config, ProxyConfig};
use authgate::http::HttpServer;
use authgate::lifecycle::Shutdown;
use authgate::observability::metrics;

/// Authenticating single-target reverse proxy.
#[derive(Parser, Debug)]
#[command(name = "authgate", version, about)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the configured one.
    #[arg(short, long)]
    bind: Option<String>,

    /// Upstream target URL, overriding the configured one.
    #[arg(short, long)]
    target: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(target) = args.target {
        config.upstream.url = target;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        auth_mode = ?config.auth.mode,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(&config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
