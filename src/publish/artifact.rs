//! Text artifact written by the client.

use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::{FailureKind, PipelineOutcome};
use crate::publish::{PublishError, Publisher};

/// Writes `Dólar: <bid>` to a file on success.
#[derive(Debug, Clone)]
pub struct ArtifactPublisher {
    path: PathBuf,
}

impl ArtifactPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Fixed-format rendering of the bid.
pub fn render(bid: f64) -> String {
    format!("Dólar: {:.2}", bid)
}

impl Publisher for ArtifactPublisher {
    type Output = PathBuf;

    fn publish(&self, outcome: &PipelineOutcome) -> Result<PathBuf, PublishError> {
        let settled = match outcome {
            PipelineOutcome::Success(settled) => settled,
            failure => {
                tracing::error!(
                    outcome = failure.label(),
                    error = %failure,
                    path = %self.path.display(),
                    "Quotation unavailable, artifact not written"
                );
                let kind = failure.failure_kind().unwrap_or(FailureKind::PublishFailed);
                return Err(PublishError::Withheld(kind));
            }
        };

        // Write beside the target and rename so readers never see a partial file.
        let mut staging = self.path.clone().into_os_string();
        staging.push(".partial");
        let staging = PathBuf::from(staging);

        fs::write(&staging, render(settled.bid())).map_err(|source| PublishError::Io {
            path: staging.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(PublishError::Io {
                path: self.path.clone(),
                source,
            });
        }

        tracing::info!(path = %self.path.display(), bid = settled.bid(), "Quotation artifact written");
        Ok(self.path.clone())
    }
}
