//! Scheduler engine implementation.
//!
//! The engine is a single spawned task that exclusively owns all mutable
//! scheduling state: the pending queue, the armed reminder, and the wakeup
//! timer. It is either idle (nothing armed, timer parked on a long sentinel)
//! or armed (one reminder held outside the queue, timer counting down to its
//! due time), and it reacts to whichever comes first:
//!
//! - A submitted reminder with an earlier due time than the armed one
//!   displaces it back into the queue and is staged and armed itself; a
//!   later or tied due time just joins the queue.
//! - Timer expiry fires the armed reminder (remove then remind, dispatched
//!   on a separate task) and arms the next queued reminder, if any.
//!
//! Nothing else ever touches the queue or the armed slot, so the loop needs
//! no locks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::core::queue::ReminderQueue;
use crate::core::reminder::Reminder;
use crate::core::types::IdIssuer;
use crate::hooks::{Hooks, LogHooks};

use super::handle::SchedulerHandle;
use super::types::EngineCommand;

/// Timer duration while nothing is armed. The loop treats an expiry of this
/// sentinel as a no-op re-arm.
const IDLE_TIMER: Duration = Duration::from_secs(24 * 60 * 60);

/// Capacity of the command channel between handle and loop. One slot keeps
/// the handoff rendezvous-like: each submission waits until the loop takes it.
const COMMAND_CHANNEL_CAPACITY: usize = 1;

/// An in-memory scheduler that fires each reminder exactly once at (or
/// after) its due time.
///
/// Construction picks the lifecycle hooks; [`start`](Scheduler::start)
/// consumes the scheduler, seeds it, and launches the control loop.
pub struct Scheduler<P> {
    hooks: Arc<dyn Hooks<P>>,
    issuer: Arc<IdIssuer>,
}

impl<P: Send + Sync + 'static> Scheduler<P> {
    /// Create a scheduler with the default hooks ([`LogHooks`]).
    pub fn new() -> Self {
        Self::with_shared_hooks(Arc::new(LogHooks))
    }

    /// Create a scheduler with the given hooks.
    pub fn with_hooks(hooks: impl Hooks<P> + 'static) -> Self {
        Self::with_shared_hooks(Arc::new(hooks))
    }

    /// Create a scheduler with shared hooks (useful when the caller keeps a
    /// reference, e.g. to inspect recorded invocations in tests).
    pub fn with_shared_hooks(hooks: Arc<dyn Hooks<P>>) -> Self {
        Self {
            hooks,
            issuer: Arc::new(IdIssuer::new()),
        }
    }

    /// Start the scheduler with an initial set of `(payload, due)` seeds and
    /// return a handle for runtime insertion plus the loop's join handle.
    ///
    /// Assigns an id to every seed in order and awaits [`Hooks::on_stage`]
    /// for each, so external bookkeeping reflects the full initial set
    /// before the loop runs. The seed with the smallest due time becomes
    /// armed; a seed already past its due time fires on the first loop tick.
    ///
    /// Consumes `self`: startup happens exactly once per scheduler, and no
    /// handle exists before it has completed.
    pub async fn start(
        self,
        seeds: impl IntoIterator<Item = (P, u64)>,
    ) -> (SchedulerHandle<P>, JoinHandle<()>) {
        let mut queue = ReminderQueue::new();
        for (payload, due) in seeds {
            let reminder = Reminder::new(self.issuer.next(), due, payload);
            self.hooks.on_stage(&reminder).await;
            queue.push(reminder);
        }

        let armed = queue.pop();
        if let Some(reminder) = &armed {
            tracing::debug!(id = %reminder.id, due = reminder.due, "Armed initial reminder");
        }

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let handle = SchedulerHandle {
            command_tx,
            issuer: Arc::clone(&self.issuer),
        };

        let loop_task = tokio::spawn(run(command_rx, queue, armed, self.hooks));

        (handle, loop_task)
    }
}

impl<P: Send + Sync + 'static> Default for Scheduler<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer deadline for a duration from now.
///
/// `Instant` addition panics on overflow, and a reminder's due time may be
/// arbitrarily far out. Saturate to the idle sentinel instead; the loop
/// re-checks the due time on expiry, so a saturated deadline re-arms rather
/// than firing early.
fn wake_deadline(dur: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(dur).unwrap_or(now + IDLE_TIMER)
}

/// Main control loop.
async fn run<P: Send + Sync + 'static>(
    mut command_rx: mpsc::Receiver<EngineCommand<P>>,
    mut queue: ReminderQueue<P>,
    mut armed: Option<Reminder<P>>,
    hooks: Arc<dyn Hooks<P>>,
) {
    let timer = tokio::time::sleep(match &armed {
        Some(reminder) => reminder.until_due(),
        None => IDLE_TIMER,
    });
    tokio::pin!(timer);

    loop {
        tokio::select! {
            command = command_rx.recv() => {
                match command {
                    Some(EngineCommand::Submit(reminder)) => {
                        // A tied due time does not displace the armed
                        // reminder; the (due, id) queue order makes it fire
                        // right after, FIFO by submission.
                        let displaces = match &armed {
                            Some(current) => reminder.due < current.due,
                            None => true,
                        };

                        if displaces {
                            if let Some(previous) = armed.take() {
                                queue.push(previous);
                            }
                            hooks.on_stage(&reminder).await;
                            tracing::debug!(id = %reminder.id, due = reminder.due, "Armed reminder");
                            timer.as_mut().reset(wake_deadline(reminder.until_due()));
                            armed = Some(reminder);
                        } else {
                            tracing::debug!(id = %reminder.id, due = reminder.due, "Queued reminder");
                            queue.push(reminder);
                        }
                    }
                    Some(EngineCommand::Shutdown { respond_to }) => {
                        let discarded = queue.len() + usize::from(armed.is_some());
                        tracing::info!(discarded, "Scheduler shutting down");
                        let _ = respond_to.send(());
                        break;
                    }
                    None => {
                        let discarded = queue.len() + usize::from(armed.is_some());
                        tracing::warn!(discarded, "All handles dropped, stopping scheduler loop");
                        break;
                    }
                }
            }

            () = &mut timer => {
                // A saturated deadline expires before the due time; re-arm
                // for the remainder instead of firing early.
                if let Some(current) = &armed {
                    let remaining = current.until_due();
                    if !remaining.is_zero() {
                        timer.as_mut().reset(wake_deadline(remaining));
                        continue;
                    }
                }

                if let Some(fired) = armed.take() {
                    tracing::debug!(id = %fired.id, due = fired.due, "Reminder fired");

                    // Fire-and-forget: the loop never waits on fire hooks,
                    // and a panicking hook stays inside this task.
                    let hooks = Arc::clone(&hooks);
                    tokio::spawn(async move {
                        hooks.on_remove(&fired).await;
                        hooks.on_remind(&fired).await;
                    });
                }

                match queue.pop() {
                    Some(next) => {
                        tracing::debug!(id = %next.id, due = next.due, "Armed reminder");
                        timer.as_mut().reset(wake_deadline(next.until_due()));
                        armed = Some(next);
                    }
                    None => {
                        timer.as_mut().reset(Instant::now() + IDLE_TIMER);
                    }
                }
            }
        }
    }
}
