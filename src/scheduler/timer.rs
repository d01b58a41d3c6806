//! Tokio-backed reset scheduler

use super::traits::{PendingReset, ResetScheduler, ResetTicket};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Spawns a sleeping task per reset and sends the ticket over a channel
/// when it wakes. The receiving end is drained by the event loop, so the
/// reset runs as an ordinary event and never alongside another handler.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: UnboundedSender<ResetTicket>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its tickets arrive on
    pub fn channel() -> (Self, UnboundedReceiver<ResetTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResetScheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, ticket: ResetTicket) -> PendingReset {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(ticket).is_err() {
                tracing::debug!(?ticket, "reset receiver closed before timer fired");
            }
        });
        PendingReset::new(task.abort_handle())
    }
}
