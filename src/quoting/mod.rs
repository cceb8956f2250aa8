//! Quotation model and payload decoding.

pub mod decoder;
pub mod types;

pub use decoder::{PayloadDecoder, RelayDecoder, UpstreamDecoder};
pub use types::{BidBody, DecodeError, PersistedQuotation, Quotation};
