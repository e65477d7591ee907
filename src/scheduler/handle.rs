//! Scheduler handle for submitting reminders to a running control loop.
//!
//! A handle exists only after [`Scheduler::start`](super::Scheduler::start)
//! has completed, so "insert before startup" cannot be expressed.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::core::reminder::Reminder;
use crate::core::types::{IdIssuer, ReminderId};

use super::types::{EngineCommand, SchedulerError};

/// Cloneable handle to a running scheduler.
///
/// All clones feed the same control loop. Dropping every clone closes the
/// command channel and stops the loop.
pub struct SchedulerHandle<P> {
    pub(crate) command_tx: mpsc::Sender<EngineCommand<P>>,
    pub(crate) issuer: Arc<IdIssuer>,
}

// Manual impl: P itself never needs to be Clone.
impl<P> Clone for SchedulerHandle<P> {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            issuer: Arc::clone(&self.issuer),
        }
    }
}

impl<P: Send + Sync + 'static> SchedulerHandle<P> {
    /// Submit a reminder due at `due` (whole seconds since the unix epoch).
    ///
    /// Assigns the reminder's id, hands it to the control loop, and returns
    /// the id. The command channel holds a single command, so this call
    /// suspends until the loop accepts the reminder; concurrent callers
    /// serialize at the channel with no fairness guarantee.
    pub async fn insert(&self, payload: P, due: u64) -> Result<ReminderId, SchedulerError> {
        let reminder = Reminder::new(self.issuer.next(), due, payload);
        let id = reminder.id;

        self.command_tx
            .send(EngineCommand::Submit(reminder))
            .await
            .map_err(|_| SchedulerError::Stopped)?;

        Ok(id)
    }

    /// Submit several reminders, one at a time, in order.
    ///
    /// Each item is handed to the loop individually, so other concurrent
    /// callers may interleave between them.
    pub async fn insert_all(
        &self,
        items: impl IntoIterator<Item = (P, u64)>,
    ) -> Result<Vec<ReminderId>, SchedulerError> {
        let mut ids = Vec::new();
        for (payload, due) in items {
            ids.push(self.insert(payload, due).await?);
        }
        Ok(ids)
    }

    /// Stop the control loop, discarding reminders that have not fired.
    ///
    /// Resolves once the loop has acknowledged and exited its command
    /// processing. Fire tasks already dispatched keep running.
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        let (respond_to, ack) = oneshot::channel();

        self.command_tx
            .send(EngineCommand::Shutdown { respond_to })
            .await
            .map_err(|_| SchedulerError::Stopped)?;

        ack.await.map_err(|_| SchedulerError::Stopped)
    }
}
