//! Core scheduling types: reminders, identifiers, and the pending queue.
//!
//! Everything in this module is plain data with no knowledge of the control
//! loop that drives it.

pub mod queue;
pub mod reminder;
pub mod types;

pub use queue::ReminderQueue;
pub use reminder::{Reminder, unix_now};
pub use types::{IdIssuer, ReminderId};
