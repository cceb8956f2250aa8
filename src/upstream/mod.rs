//! Outbound quotation fetch.

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{FetchError, RawResponse};
