//! Trait abstraction for the reset timer to enable mocking in tests

use std::time::Duration;
use tokio::task::AbortHandle;

/// Identifies one scheduled reset. A ticket that no longer matches the
/// pending reset belongs to a cancelled timer and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResetTicket(pub u64);

/// Guard for a scheduled reset. Dropping it cancels the timer.
#[derive(Debug, Default)]
pub struct PendingReset {
    handle: Option<AbortHandle>,
}

impl PendingReset {
    pub fn new(handle: AbortHandle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A guard with nothing to cancel
    #[allow(dead_code)]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Cancel the timer now
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for PendingReset {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Schedules a one-shot reset that is delivered back to the event loop
#[cfg_attr(test, mockall::automock)]
pub trait ResetScheduler: Send {
    /// Deliver `ticket` to the event loop after `delay`
    fn schedule(&mut self, delay: Duration, ticket: ResetTicket) -> PendingReset;
}
