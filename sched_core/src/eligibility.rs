//! Priority-ordered eligibility list
//!
//! One per partition: the sequence of threads that are currently
//! runnable, not suspended, and allowed to be queued (partition in
//! NORMAL mode). The head is the thread that should run next; whenever
//! the head changes, the caller must raise the invalidation signal so
//! the dispatcher re-evaluates its choice.

use core_types::{Priority, ThreadId};
use std::collections::VecDeque;

/// Priority-ordered sequence of eligible threads
///
/// Kept sorted by strictly non-increasing priority. Among equal
/// priorities, order is the order in which threads most recently became
/// eligible: insertion scans from the head and places the thread
/// immediately before the first entry whose priority is strictly lower,
/// so new arrivals join the back of their priority tier.
///
/// The list stores thread identifiers only; priorities live in the
/// registry and are supplied by the caller at insertion time.
#[derive(Debug, Clone)]
pub struct EligibilityList {
    queue: VecDeque<ThreadId>,
}

impl EligibilityList {
    /// Creates an empty list
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Inserts `thread` at its priority-ordered position
    ///
    /// Scans from the head and inserts immediately before the first
    /// entry whose priority is strictly lower than `priority`; appends
    /// at the tail when no such entry exists. Returns true when the
    /// inserted thread became the new head, in which case the caller
    /// must raise the invalidation signal.
    ///
    /// The thread must not already be in the list.
    pub fn insert<F>(&mut self, thread: ThreadId, priority: Priority, priority_of: F) -> bool
    where
        F: Fn(ThreadId) -> Priority,
    {
        debug_assert!(!self.contains(thread));

        let pos = self
            .queue
            .iter()
            .position(|&existing| priority_of(existing) < priority)
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, thread);
        pos == 0
    }

    /// Removes `thread` from the list, if present
    ///
    /// Returns true when the removed thread was the head, in which case
    /// the caller must raise the invalidation signal. Returns false when
    /// the thread was absent or not at the head.
    pub fn remove(&mut self, thread: ThreadId) -> bool {
        match self.queue.iter().position(|&id| id == thread) {
            Some(pos) => {
                self.queue.remove(pos);
                pos == 0
            }
            None => false,
        }
    }

    /// Returns the thread that should run next, if any
    pub fn head(&self) -> Option<ThreadId> {
        self.queue.front().copied()
    }

    /// Returns true if `thread` is in the list
    pub fn contains(&self, thread: ThreadId) -> bool {
        self.queue.iter().any(|&id| id == thread)
    }

    /// Returns the list in scheduling order
    pub fn iter(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.queue.iter().copied()
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Returns the number of eligible threads
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no thread is eligible
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for EligibilityList {
    fn default() -> Self {
        Self::new()
    }
}
