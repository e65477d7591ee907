//! Testing utilities for users of the tocsin library.
//!
//! [`RecordingHooks`] implements [`Hooks`] and records every invocation, so
//! hook implementors and the crate's own tests can assert on what the engine
//! did and when.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tocsin::Scheduler;
//! use tocsin::core::unix_now;
//! use tocsin::testing::RecordingHooks;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let hooks = RecordingHooks::new();
//! let scheduler = Scheduler::with_shared_hooks(hooks.clone());
//!
//! let (handle, loop_task) = scheduler.start([("stretch", unix_now())]).await;
//! hooks.wait_for_reminds(1, Duration::from_secs(1)).await;
//!
//! assert_eq!(hooks.stage_count().await, 1);
//! handle.shutdown().await.unwrap();
//! let _ = loop_task.await;
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::reminder::Reminder;
use crate::core::types::ReminderId;
use crate::hooks::Hooks;

/// A recorded hook invocation, in the order the hooks observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    /// `on_stage` ran for this reminder.
    Staged { id: ReminderId, due: u64 },
    /// `on_remove` ran for this reminder.
    Removed { id: ReminderId, due: u64 },
    /// `on_remind` ran for this reminder.
    Reminded { id: ReminderId, due: u64 },
}

/// Hooks that record every invocation instead of doing real work.
///
/// Payloads are not captured; only the reminder's id and due time are, which
/// keeps the recorder usable for any payload type.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    events: Mutex<Vec<HookEvent>>,
}

impl RecordingHooks {
    /// Create a shared recorder, ready to hand to
    /// [`Scheduler::with_shared_hooks`](crate::Scheduler::with_shared_hooks).
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All recorded events, in invocation order.
    pub async fn events(&self) -> Vec<HookEvent> {
        self.events.lock().await.clone()
    }

    /// Ids of reminders that were staged, in invocation order.
    pub async fn stages(&self) -> Vec<ReminderId> {
        self.collect(|e| match e {
            HookEvent::Staged { id, .. } => Some(*id),
            _ => None,
        })
        .await
    }

    /// Ids of reminders that had `on_remove` run, in invocation order.
    pub async fn removes(&self) -> Vec<ReminderId> {
        self.collect(|e| match e {
            HookEvent::Removed { id, .. } => Some(*id),
            _ => None,
        })
        .await
    }

    /// Ids of reminders that had `on_remind` run, in invocation order.
    pub async fn reminds(&self) -> Vec<ReminderId> {
        self.collect(|e| match e {
            HookEvent::Reminded { id, .. } => Some(*id),
            _ => None,
        })
        .await
    }

    /// Number of `on_stage` invocations so far.
    pub async fn stage_count(&self) -> usize {
        self.stages().await.len()
    }

    /// Number of `on_remind` invocations so far.
    pub async fn remind_count(&self) -> usize {
        self.reminds().await.len()
    }

    /// Wait until at least `n` reminders have had `on_remind` run, polling
    /// every 10ms.
    ///
    /// # Panics
    ///
    /// Panics if the timeout elapses first.
    pub async fn wait_for_reminds(&self, n: usize, timeout: Duration) {
        let start = tokio::time::Instant::now();
        loop {
            let count = self.remind_count().await;
            if count >= n {
                return;
            }
            if start.elapsed() > timeout {
                panic!("Timeout waiting for {} remind(s), got {}", n, count);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    async fn collect<T>(&self, mut pick: impl FnMut(&HookEvent) -> Option<T>) -> Vec<T> {
        self.events.lock().await.iter().filter_map(&mut pick).collect()
    }
}

#[async_trait]
impl<P: Send + Sync> Hooks<P> for RecordingHooks {
    async fn on_stage(&self, reminder: &Reminder<P>) {
        self.events.lock().await.push(HookEvent::Staged {
            id: reminder.id,
            due: reminder.due,
        });
    }

    async fn on_remove(&self, reminder: &Reminder<P>) {
        self.events.lock().await.push(HookEvent::Removed {
            id: reminder.id,
            due: reminder.due,
        });
    }

    async fn on_remind(&self, reminder: &Reminder<P>) {
        self.events.lock().await.push(HookEvent::Reminded {
            id: reminder.id,
            due: reminder.due,
        });
    }
}
