//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Invocation budget (Deadline)
//!     → deadline.rs (derive stage deadline: min(remaining, ceiling))
//!     → timeouts.rs (race the stage against deadline and cancellation)
//!     → Interrupt classified by the stage as its own timeout error
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: one attempt per stage

pub mod deadline;
pub mod timeouts;

pub use deadline::Deadline;
pub use timeouts::{bounded, Interrupt};
