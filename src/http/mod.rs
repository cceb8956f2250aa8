//! HTTP serving boundary.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → pipeline::Pipeline::execute
//!     → publish::ResponsePublisher
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
