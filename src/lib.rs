//! Deadline-budgeted currency quotation relay.
//!
//! Fetches a quotation from a third-party API, optionally appends it to a
//! SQLite log, and republishes the bid as an HTTP response or a text file.
//! Every stage runs under its own deadline carved out of the invocation
//! budget.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod publish;
pub mod quoting;
pub mod resilience;
pub mod storage;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{Pipeline, PipelineOutcome, QuoteRequest};
