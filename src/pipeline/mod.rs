//! Quotation pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! QuoteRequest (deadline + cancellation)
//!     → upstream::UpstreamClient   (fetch ceiling)
//!     → quoting::PayloadDecoder    (pure)
//!     → storage::QuotationStore    (store ceiling, optional)
//!     → publish::Publisher
//!     → PipelineOutcome
//! ```

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::{Delivery, Pipeline, QuoteRequest, Stage};
pub use outcome::{FailureKind, PipelineOutcome, Settled};
