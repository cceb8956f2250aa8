//! Terminal outcomes of one invocation.

use std::fmt;

use crate::publish::PublishError;
use crate::quoting::{DecodeError, PersistedQuotation, Quotation};
use crate::storage::StoreError;
use crate::upstream::FetchError;

/// Failure taxonomy. Every stage error maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    FetchTimeout,
    FetchTransport,
    DecodeMalformed,
    StoreUnavailable,
    StoreTimeout,
    StoreWrite,
    PublishFailed,
}

impl FailureKind {
    /// Stable snake_case label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::FetchTimeout => "fetch_timeout",
            FailureKind::FetchTransport => "fetch_transport",
            FailureKind::DecodeMalformed => "decode_malformed",
            FailureKind::StoreUnavailable => "store_unavailable",
            FailureKind::StoreTimeout => "store_timeout",
            FailureKind::StoreWrite => "store_write",
            FailureKind::PublishFailed => "publish_failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    pub quotation: Quotation,
    /// Present when the pipeline persisted the quotation.
    pub persisted: Option<PersistedQuotation>,
}

impl Settled {
    pub fn bid(&self) -> f64 {
        self.quotation.bid
    }
}

/// Tagged result of one invocation. Exactly one tag per run.
#[derive(Debug)]
pub enum PipelineOutcome {
    Success(Settled),
    FetchFailed(FetchError),
    DecodeFailed(DecodeError),
    StoreFailed(StoreError),
    /// Fetch (and persist, if configured) succeeded but the result could not
    /// be handed over.
    PublishFailed { error: PublishError, settled: Settled },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success(_))
    }

    pub fn bid(&self) -> Option<f64> {
        match self {
            PipelineOutcome::Success(settled) => Some(settled.bid()),
            _ => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        let kind = match self {
            PipelineOutcome::Success(_) => return None,
            PipelineOutcome::FetchFailed(FetchError::Timeout(_)) => FailureKind::FetchTimeout,
            PipelineOutcome::FetchFailed(FetchError::Transport(_)) => FailureKind::FetchTransport,
            PipelineOutcome::DecodeFailed(_) => FailureKind::DecodeMalformed,
            PipelineOutcome::StoreFailed(StoreError::Unavailable(_)) => FailureKind::StoreUnavailable,
            PipelineOutcome::StoreFailed(StoreError::Timeout(_)) => FailureKind::StoreTimeout,
            PipelineOutcome::StoreFailed(StoreError::Write(_)) => FailureKind::StoreWrite,
            PipelineOutcome::PublishFailed { .. } => FailureKind::PublishFailed,
        };
        Some(kind)
    }

    /// "success" or the failure kind label.
    pub fn label(&self) -> &'static str {
        self.failure_kind().map_or("success", |kind| kind.as_str())
    }
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Success(settled) => write!(f, "bid {}", settled.quotation.bid_text),
            PipelineOutcome::FetchFailed(e) => write!(f, "{}", e),
            PipelineOutcome::DecodeFailed(e) => write!(f, "{}", e),
            PipelineOutcome::StoreFailed(e) => write!(f, "{}", e),
            PipelineOutcome::PublishFailed { error, .. } => write!(f, "{}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::Interrupt;

    #[test]
    fn test_failure_kinds_are_one_to_one() {
        let cases = [
            (PipelineOutcome::FetchFailed(FetchError::Timeout(Interrupt::Cancelled)), FailureKind::FetchTimeout),
            (PipelineOutcome::FetchFailed(FetchError::Transport("reset".into())), FailureKind::FetchTransport),
            (PipelineOutcome::DecodeFailed(DecodeError::InvalidBid("abc".into())), FailureKind::DecodeMalformed),
            (PipelineOutcome::StoreFailed(StoreError::Unavailable("locked".into())), FailureKind::StoreUnavailable),
            (PipelineOutcome::StoreFailed(StoreError::Timeout(Interrupt::DeadlineElapsed)), FailureKind::StoreTimeout),
            (PipelineOutcome::StoreFailed(StoreError::Write("constraint".into())), FailureKind::StoreWrite),
        ];

        for (outcome, kind) in cases {
            assert!(!outcome.is_success());
            assert_eq!(outcome.failure_kind(), Some(kind));
            assert_eq!(outcome.label(), kind.as_str());
            assert_eq!(outcome.bid(), None);
        }
    }

    #[test]
    fn test_success() {
        let outcome = PipelineOutcome::Success(Settled {
            quotation: Quotation::from_bid(5.43),
            persisted: None,
        });
        assert!(outcome.is_success());
        assert_eq!(outcome.failure_kind(), None);
        assert_eq!(outcome.label(), "success");
        assert_eq!(outcome.bid(), Some(5.43));
        assert_eq!(outcome.to_string(), "bid 5.43");
    }
}
