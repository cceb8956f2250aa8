//! Metrics collection and exposition.
//!
//! # Metrics
//! - `quote_pipeline_outcomes_total` (counter): invocations by outcome label
//! - `quote_pipeline_stage_duration_seconds` (histogram): latency per stage
//!
//! Recording is a no-op until a recorder is installed.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_outcome(outcome: &'static str) {
    ::metrics::counter!("quote_pipeline_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn record_stage(stage: &'static str, started: Instant) {
    ::metrics::histogram!("quote_pipeline_stage_duration_seconds", "stage" => stage)
        .record(started.elapsed().as_secs_f64());
}
