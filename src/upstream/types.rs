//! Outbound call types and error definitions.

use bytes::Bytes;
use thiserror::Error;

use crate::resilience::Interrupt;

/// Uninterpreted response of the single outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status, passed through to the decoder unjudged.
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors that can occur during the outbound fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Stage deadline elapsed or the invocation was cancelled.
    #[error("upstream fetch interrupted: {0}")]
    Timeout(Interrupt),

    /// Connection, protocol or body read failure.
    #[error("upstream transport error: {0}")]
    Transport(String),
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
