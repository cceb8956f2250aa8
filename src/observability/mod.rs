//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline stages produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (outcome counters, stage histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the HTTP layer into every log line
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
