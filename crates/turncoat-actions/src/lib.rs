//! The action queue: an append-only FIFO buffer of submitted actions.
//!
//! # Concurrency note
//!
//! `ActionQueue` is NOT thread-safe by itself — it's a plain `Vec` owned by
//! the scheduler task. External submissions reach it through the scheduler's
//! command channel, so by the time `enqueue` runs there is exactly one
//! writer. Keeping it simple here avoids hidden locking overhead.

use turncoat_protocol::QueuedAction;

/// An ordered buffer of actions awaiting resolution.
///
/// Eligibility is the *caller's* problem — the scheduler checks the
/// submitter's interaction state before constructing a `QueuedAction`.
/// This type only promises FIFO order and an all-or-nothing drain.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: Vec<QueuedAction>,
}

impl ActionQueue {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action to the tail. Pure buffering, no validation.
    pub fn enqueue(&mut self, action: QueuedAction) {
        self.actions.push(action);
    }

    /// Atomically detaches and returns the entire buffer in submission
    /// order, leaving the queue empty.
    ///
    /// This is the only consumer-facing read. A caller never sees a
    /// partial batch, and draining an empty queue just returns an empty
    /// vec.
    pub fn dequeue_all(&mut self) -> Vec<QueuedAction> {
        std::mem::take(&mut self.actions)
    }

    /// Non-destructive view of the buffered actions, in submission order.
    pub fn peek_all(&self) -> &[QueuedAction] {
        &self.actions
    }

    /// Number of buffered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Discards everything. Used by the scheduler's `reset()`.
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

// =========================================================================
// Tests
// =========================================================================
