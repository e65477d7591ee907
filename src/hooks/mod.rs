//! Lifecycle hooks invoked by the scheduler engine.
//!
//! Hooks are the engine's only outward-facing seam: staging a reminder for
//! durable bookkeeping, erasing it when it fires, and carrying out the fire
//! action itself. The engine performs no persistence of its own; the
//! defaults are inert stand-ins.

use async_trait::async_trait;

use crate::core::reminder::Reminder;

/// Callbacks invoked at reminder lifecycle points.
///
/// One `Hooks` value is supplied per scheduler instance at construction;
/// there is no runtime replacement. Implementations must not assume
/// exclusive access to any engine state: `on_remove` and `on_remind` run on
/// a task dispatched independently of the control loop, so invocations for
/// successive fired reminders may overlap.
#[async_trait]
pub trait Hooks<P: Send + Sync>: Send + Sync {
    /// Called exactly once when a reminder becomes armed, either at startup
    /// for each seed or when an inserted reminder displaces the armed one.
    ///
    /// The loop awaits this call before arming the timer, so durable
    /// bookkeeping is in place before the reminder can fire.
    async fn on_stage(&self, _reminder: &Reminder<P>) {}

    /// Called exactly once when a reminder fires, before [`Hooks::on_remind`].
    /// Intended to erase whatever [`Hooks::on_stage`] recorded.
    async fn on_remove(&self, _reminder: &Reminder<P>) {}

    /// Called exactly once when a reminder fires, immediately after
    /// [`Hooks::on_remove`]. Carries out the scheduled action.
    async fn on_remind(&self, reminder: &Reminder<P>);
}

/// Default hooks: staging and removal are no-ops, fired reminders are
/// logged.
#[derive(Debug, Default)]
pub struct LogHooks;

#[async_trait]
impl<P: Send + Sync> Hooks<P> for LogHooks {
    async fn on_remind(&self, reminder: &Reminder<P>) {
        tracing::info!(id = %reminder.id, due = reminder.due, "Reminder due");
    }
}
