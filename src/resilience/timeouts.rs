//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap stage calls with their derived deadline
//! - Stop waiting when an ambient cancellation signal fires
//! - Cancel operations cleanly on timeout (the pending future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - An already elapsed deadline fails before the operation is polled

use std::fmt;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::resilience::deadline::Deadline;

/// Why a bounded wait gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    DeadlineElapsed,
    Cancelled,
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interrupt::DeadlineElapsed => write!(f, "deadline elapsed"),
            Interrupt::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Run `operation` until it completes, `deadline` passes or `cancel` fires.
pub async fn bounded<F>(
    deadline: Deadline,
    cancel: Option<&CancellationToken>,
    operation: F,
) -> Result<F::Output, Interrupt>
where
    F: Future,
{
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(Interrupt::Cancelled);
    }
    if deadline.is_elapsed() {
        return Err(Interrupt::DeadlineElapsed);
    }

    let cancelled = async {
        match cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        output = operation => Ok(output),
        _ = tokio::time::sleep_until(deadline.instant()) => Err(Interrupt::DeadlineElapsed),
        _ = cancelled => Err(Interrupt::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_completes_within_deadline() {
        let deadline = Deadline::after(Duration::from_millis(100));
        let result = bounded(deadline, None, async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            42
        })
        .await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let result = bounded(deadline, None, async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        })
        .await;
        assert_eq!(result, Err(Interrupt::DeadlineElapsed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_deadline_never_polls() {
        let polled = AtomicBool::new(false);
        let deadline = Deadline::after(Duration::ZERO);

        let result = bounded(deadline, None, async {
            polled.store(true, Ordering::SeqCst);
        })
        .await;

        assert_eq!(result, Err(Interrupt::DeadlineElapsed));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_wins() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            trigger.cancel();
        });

        let deadline = Deadline::after(Duration::from_secs(10));
        let result = bounded(deadline, Some(&token), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        })
        .await;
        assert_eq!(result, Err(Interrupt::Cancelled));
    }

    #[test]
    fn test_display() {
        assert_eq!(Interrupt::DeadlineElapsed.to_string(), "deadline elapsed");
        assert_eq!(Interrupt::Cancelled.to_string(), "cancelled");
    }
}
