//! Carpool matching service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (router, middleware) ──▶ handlers
//!                                                     │
//!                      ┌──────────────────────────────┼─────────────────────┐
//!                      ▼                              ▼                     ▼
//!               registry (DashMap)          matching (pure fns)       booking
//!               register / update /         proximity, city pair      seat lock
//!               remove / seats / snapshot          │                     │
//!                      │                           ▼                     ▼
//!                      └──────────────▶ persistence (drivers file, request history)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use carpool_matcher::config::{load_config, ServiceConfig};
use carpool_matcher::lifecycle::{bootstrap, Shutdown};
use carpool_matcher::observability::{logging, metrics};
use carpool_matcher::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "carpool-matcher", version, about = "Carpool driver registry and matching service")]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("carpool-matcher v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_distance_km = config.matching.default_max_distance_km,
        top_n = config.matching.default_top_n,
        drivers_path = ?config.persistence.drivers_path,
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

    let services = bootstrap(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_ctrl_c());

    let server = HttpServer::new(config, services);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
