//! Core identifier types for the scheduler.
//!
//! Reminder identifiers are assigned by the engine, never by callers, and
//! are strictly increasing for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReminderId(u64);

impl ReminderId {
    /// Create a ReminderId from a raw value.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ReminderId {
    fn from(id: u64) -> Self {
        Self::from_raw(id)
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues process-wide unique reminder identifiers.
///
/// Every call to [`next`](IdIssuer::next) returns an id strictly greater
/// than any previously returned one, from any number of threads, with no
/// external synchronization. The first issued id is 1.
#[derive(Debug, Default)]
pub struct IdIssuer {
    counter: AtomicU64,
}

impl IdIssuer {
    /// Create a fresh issuer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identifier.
    pub fn next(&self) -> ReminderId {
        ReminderId(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
