//! Priority collection of pending reminders, ordered by due time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::reminder::Reminder;

/// A heap entry wrapping a reminder.
///
/// Uses reversed ordering so `BinaryHeap` (a max-heap) behaves as a min-heap.
/// Ordering is by due time ascending with id ascending as the tiebreaker, so
/// reminders sharing a due time pop in submission order.
#[derive(Debug)]
struct Entry<P>(Reminder<P>);

impl<P> PartialEq for Entry<P> {
    fn eq(&self, other: &Self) -> bool {
        self.0.due == other.0.due && self.0.id == other.0.id
    }
}

impl<P> Eq for Entry<P> {}

impl<P> Ord for Entry<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .0
            .due
            .cmp(&self.0.due)
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

impl<P> PartialOrd for Entry<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue of reminders not currently armed.
///
/// Insert and extract-minimum are O(log n). The queue carries no internal
/// synchronization: the control loop is its only owner.
#[derive(Debug, Default)]
pub struct ReminderQueue<P> {
    heap: BinaryHeap<Entry<P>>,
}

impl<P> ReminderQueue<P> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Insert a reminder, placed by `(due, id)` order.
    pub fn push(&mut self, reminder: Reminder<P>) {
        self.heap.push(Entry(reminder));
    }

    /// Remove and return the reminder with the smallest `(due, id)`.
    pub fn pop(&mut self) -> Option<Reminder<P>> {
        self.heap.pop().map(|entry| entry.0)
    }

    /// Number of pending reminders.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue holds no reminders.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
