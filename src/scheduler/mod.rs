//! Scheduler engine for firing reminders at their due times.
//!
//! This module provides the control loop that owns all scheduling state,
//! the handle used to submit reminders to it, and the scheduler's error
//! type.

mod engine;
mod handle;
mod types;

pub use engine::Scheduler;
pub use handle::SchedulerHandle;
pub use types::SchedulerError;
