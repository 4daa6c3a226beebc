//! Transaction explorer web server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                ┌──────────────────────────────────────────────┐
//!     ───────────────────────┼─▶ http::server (axum + tower-http layers)     │
//!                            │        │                                      │
//!                            │        ▼                                      │
//!                            │   http::handlers ──▶ transactions (view      │
//!                            │        │              models, form, scaling)  │
//!                            │        ▼                                      │
//!                            │   blockcypher::client ───────────────────────┼──▶ Hosted API
//!                            │        │                                      │
//!     ◀──────────────────────┼── http::pages / JSON                         │
//!                            └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tx_explorer::config::load_or_default;
use tx_explorer::lifecycle::{signals, Shutdown};
use tx_explorer::observability::{logging, metrics};
use tx_explorer::HttpServer;

#[derive(Parser)]
#[command(name = "tx-explorer")]
#[command(about = "Transaction explorer backed by a hosted blockchain API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_or_default(args.config.as_deref())?;
    logging::init_logging(&config.observability)?;

    tracing::info!("tx-explorer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_base = %config.blockcypher.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address was checked during validation
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.signal();

    let signal_task = tokio::spawn(async move {
        signals::wait_for_signal(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;
    signal_task.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
