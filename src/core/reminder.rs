//! The unit of scheduling: a payload bound to an absolute due time.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::core::types::ReminderId;

/// A scheduled reminder.
///
/// Reminders are created by the engine when a `(payload, due)` pair is
/// submitted; the id comes from the engine's issuer and the due time is
/// never mutated afterwards. The payload is opaque to the engine and only
/// travels back out through the lifecycle hooks. Constructing a `Reminder`
/// directly is useful when exercising hook implementations; the engine
/// ignores caller-built ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder<P> {
    /// Engine-assigned unique identifier.
    pub id: ReminderId,
    /// Absolute due time, whole seconds since the unix epoch.
    pub due: u64,
    /// Caller-defined data carried through to the hooks.
    pub payload: P,
}

impl<P> Reminder<P> {
    /// Create a reminder with an explicit id.
    pub fn new(id: ReminderId, due: u64, payload: P) -> Self {
        Self { id, due, payload }
    }

    /// Remaining time until the due point, clamped to zero once due.
    ///
    /// Computed from a single wall-clock snapshot; the sub-second part of
    /// "now" is kept so the result lands on the due second's boundary.
    pub fn until_due(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Duration::from_secs(self.due).saturating_sub(now)
    }
}

/// Current wall-clock time as whole seconds since the unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
