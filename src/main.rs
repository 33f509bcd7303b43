//! Price lookup service.
//!
//! Serves product prices from a spreadsheet and tells connected pages when
//! the spreadsheet changes.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                   PRICE LOOKUP                       │
//!                 │                                                      │
//!   HTTP request  │  ┌─────────┐    ┌──────────┐    ┌───────────────┐   │
//!   ──────────────┼─▶│  http   │───▶│   api    │───▶│ catalog store │◀──┼── productos_precios.xlsx
//!                 │  │ server  │    │ handlers │    │  (ArcSwap)    │   │   (polled mtime)
//!                 │  └────┬────┘    └──────────┘    └───────▲───────┘   │
//!                 │       │ /ws                             │ reload    │
//!                 │       ▼                                 │ check     │
//!   WebSocket     │  ┌─────────┐    ┌──────────┐    ┌──────┴────────┐   │
//!   ◀─────────────┼──│ writer  │◀───│ registry │◀───│  poll loop    │   │
//!                 │  └─────────┘    └──────────┘    └───────────────┘   │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use price_lookup::config::{load_config, ServiceConfig};
use price_lookup::observability::{logging, metrics};
use price_lookup::HttpServer;

#[derive(Parser)]
#[command(name = "price-lookup")]
#[command(about = "Price lookup web service with live reload", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `catalog.data_path`.
    #[arg(short, long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(data) = args.data {
        config.catalog.data_path = data;
    }

    logging::init_logging(&config.observability);

    tracing::info!("price-lookup v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        data_path = ?config.catalog.data_path,
        poll_interval_ms = config.live.poll_interval_ms,
        notify_mode = ?config.live.notify_mode,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
