//! Session proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                 SESSION PROXY                 │
//!   GET /api/me    │  ┌────────┐   ┌─────────┐   ┌──────────────┐  │
//!   Cookie: ...  ──┼─▶│  http  │──▶│ routing │──▶│   upstream   │──┼──▶ GET /api/auth/me
//!                  │  │ server │   │  table  │   │    client    │  │    Cookie: ...
//!                  │  └────────┘   └─────────┘   └──────┬───────┘  │
//!                  │                                    ▼          │
//!   status, JSON   │  ┌────────┐                 ┌──────────────┐  │
//!   Set-Cookie×n ◀─┼──│ relay  │◀────────────────│   cookies    │◀─┼─── status, JSON,
//!                  │  └────────┘                 │    relay     │  │    Set-Cookie×n
//!                  │                             └──────────────┘  │
//!                  └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use session_proxy::config::load_config;
use session_proxy::lifecycle::{signals, Shutdown};
use session_proxy::observability::{logging, metrics};
use session_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "session-proxy")]
#[command(about = "Relays session cookies between browsers and an upstream auth backend", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the upstream base URL
    #[arg(short, long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = args.upstream {
        config.upstream.base_url = upstream;
    }
    if let Err(errors) = session_proxy::config::validation::validate_config(&config) {
        return Err(session_proxy::config::ConfigError::Validation(errors).into());
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("session-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        extra_routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
