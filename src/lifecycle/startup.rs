//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order: store, caller, pipeline
//! - Hand the storage handle to the pipeline explicitly
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration is validated before this point

use std::sync::Arc;
use thiserror::Error;

use crate::config::{ClientConfig, RelayConfig};
use crate::pipeline::Pipeline;
use crate::quoting::{RelayDecoder, UpstreamDecoder};
use crate::storage::{QuotationStore, StoreError};
use crate::upstream::{FetchError, UpstreamClient};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot build upstream client: {0}")]
    Upstream(#[from] FetchError),

    #[error("cannot open quotation store: {0}")]
    Store(#[from] StoreError),
}

/// Subsystems owned by the serving process.
pub struct Services {
    pub pipeline: Pipeline,
    /// Kept by the process so it can be closed on shutdown.
    pub store: Option<QuotationStore>,
}

/// Build the server-side pipeline: upstream fetch, decode, persist.
pub async fn build_services(config: &RelayConfig) -> Result<Services, StartupError> {
    let store = if config.storage.enabled {
        Some(QuotationStore::connect(&config.storage).await?)
    } else {
        tracing::warn!("Quotation store disabled, quotations will not be persisted");
        None
    };

    let caller = UpstreamClient::new(&config.upstream.url)?;
    let decoder = Arc::new(UpstreamDecoder::new(config.upstream.pair.clone()));
    let pipeline = Pipeline::new(caller, decoder, store.clone(), config.budget);

    tracing::info!(
        upstream = %config.upstream.url,
        pair = %config.upstream.pair,
        overall_ms = config.budget.overall_ms,
        fetch_ceiling_ms = config.budget.fetch_ceiling_ms,
        store_ceiling_ms = config.budget.store_ceiling_ms,
        persist = store.is_some(),
        "Pipeline ready"
    );
    Ok(Services { pipeline, store })
}

/// Build the client-side pipeline: fetch from the relay, decode, no persist.
pub fn build_client_pipeline(config: &ClientConfig) -> Result<Pipeline, StartupError> {
    let caller = UpstreamClient::new(&config.server_url)?;
    Ok(Pipeline::new(caller, Arc::new(RelayDecoder), None, config.budget))
}
