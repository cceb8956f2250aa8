//! Quotation relay server.
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!   GET /cotacao    │                  QUOTE RELAY                     │
//!  ─────────────────┼─▶ http ──▶ pipeline ──▶ upstream ──────────────┼──▶ Quotation API
//!                   │               │      ◀── (fetch ceiling)        │
//!                   │               ▼                                  │
//!                   │            quoting (decode)                      │
//!                   │               │                                  │
//!                   │               ▼                                  │
//!                   │            storage ──▶ SQLite (store ceiling)    │
//!                   │               │                                  │
//!  ◀────────────────┼── publish ◀───┘                                  │
//!   {"bid": 5.43}   └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use quote_relay::config::load_or_default;
use quote_relay::http::HttpServer;
use quote_relay::lifecycle::{build_services, signals, Shutdown};
use quote_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "quote-relay")]
#[command(about = "Fetches, stores and republishes currency quotations", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init(&config.observability.log_level);
    tracing::info!("quote-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let services = build_services(&config).await?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(services.pipeline, shutdown);
    server.run(listener).await?;

    if let Some(store) = services.store {
        store.close().await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
