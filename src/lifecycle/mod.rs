//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Open store → Build pipeline → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Cancel in-flight invocations → Drain → Close store
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_client_pipeline, build_services, Services, StartupError};
