//! Quotation log storage.
//!
//! The store handle is created once by the process that starts the pipeline
//! and injected into it; nothing reaches the database through global state.

pub mod store;
pub mod types;

pub use store::QuotationStore;
pub use types::StoreError;
