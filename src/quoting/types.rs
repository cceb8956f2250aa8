//! Quotation data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A decoded currency quotation.
///
/// Text fields are kept exactly as the provider sent them; only `bid` is
/// interpreted, because it is the value republished downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Quotation {
    /// Key the quotation was found under (e.g., "USDBRL").
    pub pair: String,
    pub code: String,
    pub codein: String,
    pub name: String,
    pub high: String,
    pub low: String,
    pub var_bid: String,
    pub pct_change: String,
    /// Parsed bid, finite and non-negative.
    pub bid: f64,
    /// Bid as published upstream (stored verbatim).
    pub bid_text: String,
    pub ask: String,
    /// Provider timestamp (epoch seconds, as text).
    pub timestamp: String,
    pub create_date: String,
}

impl Quotation {
    /// Quotation that only knows its bid, as republished by the relay.
    pub fn from_bid(bid: f64) -> Self {
        Self {
            bid,
            bid_text: bid.to_string(),
            ..Self::default()
        }
    }
}

/// A quotation appended to the quotation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedQuotation {
    /// Identifier generated at persistence time.
    pub id: Uuid,
    pub inserted_at: DateTime<Utc>,
    pub quotation: Quotation,
}

/// Body of the serving boundary's success response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BidBody {
    pub bid: f64,
}

/// Payload could not be turned into a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed payload: invalid JSON: {0}")]
    InvalidJson(String),

    #[error("malformed payload: missing {0}")]
    MissingKey(String),

    #[error("malformed payload: bid {0:?} is not a finite non-negative number")]
    InvalidBid(String),
}

/// Result type for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;
