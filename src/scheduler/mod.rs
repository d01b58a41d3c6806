//! Deferred task scheduling for the submission reset timer

mod timer;
mod traits;

pub use timer::TokioScheduler;
pub use traits::{PendingReset, ResetScheduler, ResetTicket};

#[cfg(test)]
pub use traits::MockResetScheduler;
