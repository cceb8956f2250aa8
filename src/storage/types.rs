//! Quotation log error definitions.

use thiserror::Error;

use crate::resilience::Interrupt;

/// Errors that can occur while appending to the quotation log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not open, initialize or reach the database.
    #[error("quotation store unavailable: {0}")]
    Unavailable(String),

    /// Store deadline elapsed or the invocation was cancelled before commit.
    #[error("quotation store write interrupted: {0}")]
    Timeout(Interrupt),

    /// The insert itself was rejected.
    #[error("quotation store rejected write: {0}")]
    Write(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

pub(crate) fn rejected(err: sqlx::Error) -> StoreError {
    StoreError::Write(err.to_string())
}
