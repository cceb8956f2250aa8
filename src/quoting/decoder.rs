//! Payload decoding.
//!
//! Decoders are pure: same bytes in, same quotation or error out. Every
//! failure is a [`DecodeError`], never a transport classification.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::quoting::types::{BidBody, DecodeError, DecodeResult, Quotation};

/// Turns raw response bytes into a quotation.
pub trait PayloadDecoder: Send + Sync {
    fn decode(&self, body: &[u8]) -> DecodeResult<Quotation>;
}

/// Decoder for the provider's `{ "<PAIR>": { ... } }` document.
#[derive(Debug, Clone)]
pub struct UpstreamDecoder {
    pair: String,
}

/// Fields of one pair entry. Everything is text on the wire.
#[derive(Debug, Deserialize)]
struct PairEntry {
    #[serde(default)]
    code: String,
    #[serde(default)]
    codein: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    high: String,
    #[serde(default)]
    low: String,
    #[serde(default, rename = "varBid")]
    var_bid: String,
    #[serde(default, rename = "pctChange")]
    pct_change: String,
    bid: Option<Value>,
    #[serde(default)]
    ask: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    create_date: String,
}

impl UpstreamDecoder {
    pub fn new(pair: impl Into<String>) -> Self {
        Self { pair: pair.into() }
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }
}

impl PayloadDecoder for UpstreamDecoder {
    fn decode(&self, body: &[u8]) -> DecodeResult<Quotation> {
        let document: Map<String, Value> = serde_json::from_slice(body)
            .map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

        let entry = document
            .get(&self.pair)
            .cloned()
            .ok_or_else(|| DecodeError::MissingKey(self.pair.clone()))?;
        let entry: PairEntry = serde_json::from_value(entry)
            .map_err(|e| DecodeError::InvalidJson(format!("{}: {}", self.pair, e)))?;

        let bid_text = match entry.bid {
            Some(Value::String(text)) => text,
            Some(other) => return Err(DecodeError::InvalidBid(other.to_string())),
            None => return Err(DecodeError::MissingKey(format!("{}.bid", self.pair))),
        };
        let bid = parse_bid(&bid_text)?;

        Ok(Quotation {
            pair: self.pair.clone(),
            code: entry.code,
            codein: entry.codein,
            name: entry.name,
            high: entry.high,
            low: entry.low,
            var_bid: entry.var_bid,
            pct_change: entry.pct_change,
            bid,
            bid_text,
            ask: entry.ask,
            timestamp: entry.timestamp,
            create_date: entry.create_date,
        })
    }
}

/// Decoder for the relay's own `{"bid": <number>}` response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelayDecoder;

impl PayloadDecoder for RelayDecoder {
    fn decode(&self, body: &[u8]) -> DecodeResult<Quotation> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        if value.get("bid").is_none() {
            return Err(DecodeError::MissingKey("bid".to_string()));
        }
        let body: BidBody = serde_json::from_value(value)
            .map_err(|e| DecodeError::InvalidBid(e.to_string()))?;
        if !body.bid.is_finite() || body.bid < 0.0 {
            return Err(DecodeError::InvalidBid(body.bid.to_string()));
        }
        Ok(Quotation::from_bid(body.bid))
    }
}

/// Parse a bid string. Absent, non-numeric, infinite or negative is malformed.
pub fn parse_bid(text: &str) -> DecodeResult<f64> {
    let bid: f64 = text
        .parse()
        .map_err(|_| DecodeError::InvalidBid(text.to_string()))?;
    if !bid.is_finite() || bid < 0.0 {
        return Err(DecodeError::InvalidBid(text.to_string()));
    }
    Ok(bid)
}
