//! Result publishing: the last stage of the chain.
//!
//! # Data Flow
//! ```text
//! PipelineOutcome
//!     → response.rs (serving boundary: HTTP status + body)
//!     → artifact.rs (client: text file, success only)
//! ```
//!
//! # Design Decisions
//! - Publishing is synchronous; the only suspension points are I/O stages
//! - A failure outcome is surfaced, never turned into a success value

pub mod artifact;
pub mod response;

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::{FailureKind, PipelineOutcome};

pub use artifact::ArtifactPublisher;
pub use response::ResponsePublisher;

/// Renders a terminal outcome into an external form.
pub trait Publisher {
    type Output;

    fn publish(&self, outcome: &PipelineOutcome) -> Result<Self::Output, PublishError>;
}

/// Errors that can occur while publishing.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to render response: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A failure outcome has nothing to publish.
    #[error("nothing to publish: invocation ended in {0}")]
    Withheld(FailureKind),
}
