//! Absolute deadlines and their nesting.

use std::time::Duration;
use tokio::time::Instant;

/// A point in time after which a stage must stop waiting.
///
/// Deadlines only ever shrink as they are handed down: a child derived
/// through [`Deadline::child`] never ends after its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left, zero once elapsed.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Derive a stage deadline: `min(remaining, ceiling)`.
    pub fn child(&self, ceiling: Duration) -> Deadline {
        let capped = Instant::now() + ceiling;
        Deadline {
            at: self.at.min(capped),
        }
    }
}
