//! Reminder lifecycle integration tests.
//!
//! Tests that verify startup staging, due-time fire ordering, and the
//! exactly-once remove-then-remind contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tocsin::testing::{HookEvent, RecordingHooks};
use tocsin::{Hooks, Reminder, Scheduler, unix_now};
use tokio::sync::Mutex;

/// Test: Seeds with distinct due times fire in non-decreasing due order.
#[tokio::test]
async fn test_seeds_fire_in_due_time_order() {
    let hooks = RecordingHooks::new();
    let scheduler = Scheduler::with_shared_hooks(hooks.clone());

    // Seed out of due order on purpose.
    let now = unix_now();
    let (handle, loop_task) = scheduler
        .start([("second", now + 1), ("first", now), ("third", now + 2)])
        .await;

    hooks.wait_for_reminds(3, Duration::from_secs(5)).await;

    let fired_dues: Vec<u64> = hooks
        .events()
        .await
        .into_iter()
        .filter_map(|e| match e {
            HookEvent::Reminded { due, .. } => Some(due),
            _ => None,
        })
        .collect();
    assert_eq!(fired_dues, vec![now, now + 1, now + 2]);

    handle.shutdown().await.unwrap();
    let _ = loop_task.await;
}

/// Test: Startup stages every seed, and the smallest-due seed is the one
/// that fires first.
#[tokio::test]
async fn test_startup_stages_all_seeds_and_arms_earliest() {
    let hooks = RecordingHooks::new();
    let scheduler = Scheduler::with_shared_hooks(hooks.clone());

    // The earliest seed is deliberately not the first one.
    let now = unix_now();
    let (handle, loop_task) = scheduler
        .start([("late", now + 60), ("later", now + 120), ("soon", now)])
        .await;

    let stages = hooks.stages().await;
    assert_eq!(stages.len(), 3, "every seed must be staged at startup");

    hooks.wait_for_reminds(1, Duration::from_secs(2)).await;
    let reminds = hooks.reminds().await;
    assert_eq!(
        reminds[0], stages[2],
        "the smallest-due seed should fire first"
    );

    handle.shutdown().await.unwrap();
    let _ = loop_task.await;
}

/// Test: Every fired reminder gets on_remove exactly once and on_remind
/// exactly once, remove before remind.
#[tokio::test]
async fn test_exactly_once_remove_before_remind() {
    let hooks = RecordingHooks::new();
    let scheduler = Scheduler::with_shared_hooks(hooks.clone());

    let now = unix_now();
    let (handle, loop_task) = scheduler
        .start([("a", now - 2), ("b", now - 1), ("c", now)])
        .await;

    hooks.wait_for_reminds(3, Duration::from_secs(2)).await;

    let events = hooks.events().await;
    let mut reminds = hooks.reminds().await;
    reminds.sort();
    reminds.dedup();
    assert_eq!(reminds.len(), 3);

    for id in reminds {
        let removed_at = events
            .iter()
            .position(|e| matches!(e, HookEvent::Removed { id: fired, .. } if *fired == id));
        let reminded_at = events
            .iter()
            .position(|e| matches!(e, HookEvent::Reminded { id: fired, .. } if *fired == id));
        let (removed_at, reminded_at) = (
            removed_at.expect("missing remove"),
            reminded_at.expect("missing remind"),
        );
        assert!(removed_at < reminded_at, "remove must precede remind");

        let removes = events
            .iter()
            .filter(|e| matches!(e, HookEvent::Removed { id: fired, .. } if *fired == id))
            .count();
        assert_eq!(removes, 1, "on_remove must run exactly once per reminder");
    }

    handle.shutdown().await.unwrap();
    let _ = loop_task.await;
}

/// Test: A scheduler that sat idle still fires a reminder inserted later.
#[tokio::test]
async fn test_idle_scheduler_fires_late_insert() {
    let hooks = RecordingHooks::new();
    let scheduler = Scheduler::with_shared_hooks(hooks.clone());

    let (handle, loop_task) = scheduler.start([]).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(hooks.events().await.is_empty());

    let id = handle.insert("woken", unix_now() - 1).await.unwrap();
    hooks.wait_for_reminds(1, Duration::from_secs(1)).await;
    assert_eq!(hooks.reminds().await, vec![id]);

    handle.shutdown().await.unwrap();
    let _ = loop_task.await;
}

/// Hooks whose remind action panics for one payload and records the rest.
struct PanickingRemindHooks {
    reminded: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl Hooks<&'static str> for PanickingRemindHooks {
    async fn on_remind(&self, reminder: &Reminder<&'static str>) {
        if reminder.payload == "bad" {
            panic!("remind hook failed");
        }
        self.reminded.lock().await.push(reminder.payload);
    }
}

/// Test: A panicking remind hook is confined to its fire task.
///
/// The loop keeps firing later reminders and still shuts down cleanly.
#[tokio::test]
async fn test_panicking_remind_hook_does_not_stall_loop() {
    let hooks = Arc::new(PanickingRemindHooks {
        reminded: Mutex::new(Vec::new()),
    });
    let scheduler = Scheduler::with_shared_hooks(hooks.clone() as Arc<dyn Hooks<&'static str>>);

    let now = unix_now();
    let (handle, loop_task) = scheduler.start([("bad", now - 1), ("good", now)]).await;

    let start = tokio::time::Instant::now();
    loop {
        if *hooks.reminded.lock().await == ["good"] {
            break;
        }
        if start.elapsed() > Duration::from_secs(2) {
            panic!("later reminder did not fire after a hook panic");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    handle.shutdown().await.unwrap();
    loop_task
        .await
        .expect("the loop must never observe a hook panic");
}

/// Hooks whose remind action is slow, recording when each phase ran.
struct SlowRemindHooks {
    removes: Mutex<Vec<tokio::time::Instant>>,
    remind_delay: Duration,
}

#[async_trait]
impl Hooks<&'static str> for SlowRemindHooks {
    async fn on_remove(&self, _reminder: &Reminder<&'static str>) {
        self.removes.lock().await.push(tokio::time::Instant::now());
    }

    async fn on_remind(&self, _reminder: &Reminder<&'static str>) {
        tokio::time::sleep(self.remind_delay).await;
    }
}

/// Test: A slow remind hook does not delay the loop from firing the next
/// reminder, because fire work is dispatched off the loop.
#[tokio::test]
async fn test_slow_remind_does_not_delay_next_fire() {
    let hooks = Arc::new(SlowRemindHooks {
        removes: Mutex::new(Vec::new()),
        remind_delay: Duration::from_secs(3),
    });
    let scheduler = Scheduler::with_shared_hooks(hooks.clone() as Arc<dyn Hooks<&'static str>>);

    let now = unix_now();
    let (handle, loop_task) = scheduler.start([("a", now - 1), ("b", now)]).await;

    // Both fires happen back to back; if the loop awaited the 3s remind of
    // the first reminder, the second remove could not land this quickly.
    let start = tokio::time::Instant::now();
    loop {
        if hooks.removes.lock().await.len() >= 2 {
            break;
        }
        if start.elapsed() > Duration::from_secs(1) {
            panic!("second fire was delayed by the slow remind hook");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    handle.shutdown().await.unwrap();
    let _ = loop_task.await;
}
