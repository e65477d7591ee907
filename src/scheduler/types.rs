//! Scheduler type definitions.
//!
//! This module contains the error type and the command type consumed by the
//! control loop.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::core::reminder::Reminder;

/// Errors that can occur when talking to the scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The control loop is no longer running.
    #[error("scheduler is stopped")]
    Stopped,
}

/// Commands that can be sent to the control loop.
pub(crate) enum EngineCommand<P> {
    /// Submit a reminder for scheduling.
    Submit(Reminder<P>),
    /// Stop the loop, discarding any reminders that have not fired.
    Shutdown { respond_to: oneshot::Sender<()> },
}
