//! Fetches the current bid from the relay and writes it to a text file.
//!
//! Exits non-zero on any failure; no artifact is written in that case.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use quote_relay::config::load_or_default;
use quote_relay::lifecycle::build_client_pipeline;
use quote_relay::observability::logging;
use quote_relay::publish::ArtifactPublisher;

#[derive(Parser)]
#[command(name = "quote-client")]
#[command(about = "Writes the relay's current bid to a file", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Relay endpoint, overrides `client.server_url`.
    #[arg(short, long)]
    url: Option<String>,

    /// Artifact path, overrides `client.output_path`.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        url::Url::parse(&url)?;
        config.client.server_url = url;
    }

    logging::init(&config.observability.log_level);

    let pipeline = build_client_pipeline(&config.client)?;
    let publisher = ArtifactPublisher::new(
        cli.output
            .unwrap_or_else(|| PathBuf::from(&config.client.output_path)),
    );

    let delivery = pipeline.execute(pipeline.request(), &publisher).await;
    match delivery.output {
        Some(path) => {
            println!("Quotation written to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Error: {} ({})", delivery.outcome, delivery.outcome.label());
            Ok(ExitCode::FAILURE)
        }
    }
}
