//! Submission lifecycle: Editing/Submitted state and the timed auto-reset

use crate::scheduler::{PendingReset, ResetScheduler, ResetTicket};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Whether the form is being edited or shows its submitted confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SubmissionState {
    #[default]
    Editing,
    Submitted,
}

/// Owns the submission state and the one pending reset timer
pub struct SubmissionLifecycle<S> {
    state: SubmissionState,
    submitted_at: Option<DateTime<Utc>>,
    reset_delay: Duration,
    scheduler: S,
    pending: Option<(ResetTicket, PendingReset)>,
    next_ticket: u64,
}

impl<S: ResetScheduler> SubmissionLifecycle<S> {
    /// Default delay before a submitted form resets (3 seconds)
    pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(3000);

    pub fn new(scheduler: S, reset_delay: Duration) -> Self {
        Self {
            state: SubmissionState::Editing,
            submitted_at: None,
            reset_delay,
            scheduler,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.state == SubmissionState::Submitted
    }

    /// When the current submission happened, if the form is submitted
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    pub fn has_pending_reset(&self) -> bool {
        self.pending.is_some()
    }

    /// Act on a full-form verdict. Enters `Submitted` and schedules the reset
    /// only for a valid form while editing. Returns true on that transition.
    pub fn on_verdict(&mut self, is_valid: bool) -> bool {
        if !is_valid || self.is_submitted() {
            return false;
        }

        let ticket = ResetTicket(self.next_ticket);
        self.next_ticket += 1;
        let pending = self.scheduler.schedule(self.reset_delay, ticket);

        self.state = SubmissionState::Submitted;
        self.submitted_at = Some(Utc::now());
        self.pending = Some((ticket, pending));
        tracing::info!(?ticket, delay_ms = self.reset_delay.as_millis() as u64, "form submitted");
        true
    }

    /// Handle a fired reset timer. Returns true when the form went back to
    /// `Editing` and the fields must be reset.
    pub fn on_reset_elapsed(&mut self, ticket: ResetTicket) -> bool {
        match self.pending.take() {
            Some((expected, pending)) if expected == ticket => {
                // The task already finished; nothing left to abort
                drop(pending);
                self.state = SubmissionState::Editing;
                self.submitted_at = None;
                tracing::info!(?ticket, "submission reset");
                true
            }
            other => {
                self.pending = other;
                tracing::warn!(?ticket, "ignoring reset for a timer that is no longer pending");
                false
            }
        }
    }

    /// Cancel any pending reset. Called on teardown.
    pub fn shutdown(&mut self) {
        if let Some((ticket, pending)) = self.pending.take() {
            pending.cancel();
            tracing::debug!(?ticket, "cancelled pending reset");
        }
    }
}

impl<S> Drop for SubmissionLifecycle<S> {
    fn drop(&mut self) {
        if let Some((_, pending)) = self.pending.take() {
            pending.cancel();
        }
    }
}
