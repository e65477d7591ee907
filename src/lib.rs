//! tocsin - a single-process, in-memory reminder scheduler.
//!
//! Reminders are `(payload, due time)` pairs that fire exactly once at (or
//! after) their due time. A single control loop owns all scheduling state
//! and reprograms one wakeup timer to the next-due reminder; lifecycle hooks
//! ([`Hooks`]) let callers plug in persistence, removal-on-fire, and the
//! fire action itself.

pub mod core;
pub mod hooks;
pub mod scheduler;
pub mod testing;

pub use crate::core::queue::ReminderQueue;
pub use crate::core::reminder::{Reminder, unix_now};
pub use crate::core::types::{IdIssuer, ReminderId};
pub use crate::hooks::{Hooks, LogHooks};
pub use crate::scheduler::{Scheduler, SchedulerError, SchedulerHandle};
