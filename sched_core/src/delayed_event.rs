//! Delayed-event timer queues
//!
//! Each partition keeps two queues of (absolute fire tick, thread)
//! entries: one for timeouts (timed waits and timed suspensions) and one
//! for deadline supervision. Entries fire as the tick counter advances
//! past their fire tick, in tick order, FIFO among equal ticks.
//!
//! Properties the state machine relies on:
//! - At most one armed entry per thread per queue; arming replaces any
//!   prior arming for the same thread.
//! - Cancellation is exact and idempotent: cancelling an absent entry is
//!   a no-op, and a cancelled or fired entry can never fire again.

use core_types::ThreadId;
use serde::{Deserialize, Serialize};

/// What a timeout entry does to its thread when it fires
///
/// A typed completion token rather than an opaque callback: the set is
/// closed, a timeout either ends a timed wait or ends a timed
/// suspension, and the firing site matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeoutAction {
    /// Wake the thread from a timed wait
    Wake,
    /// End a timed suspension: clear the suspended flag and resume
    EndSuspension,
}

/// One armed entry in a delayed-event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedEvent<T> {
    /// Absolute tick at which the entry fires
    pub fire_at: u64,
    /// Thread the entry belongs to
    pub thread: ThreadId,
    /// Completion token carried to the firing site
    pub payload: T,
}

/// A queue of delayed events sorted by fire tick
///
/// Backed by a plain sorted vector: partitions hold tens of threads, and
/// every mutation happens at a known position found by one scan.
#[derive(Debug, Clone)]
pub struct DelayedEventQueue<T> {
    entries: Vec<DelayedEvent<T>>,
}

/// Timeout queue: timed waits and timed suspensions
pub type TimeoutQueue = DelayedEventQueue<TimeoutAction>;

/// Deadline queue: time-budget supervision
pub type DeadlineQueue = DelayedEventQueue<()>;

impl<T: Copy> DelayedEventQueue<T> {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Arms an entry for `thread` at `fire_at`
    ///
    /// Any prior arming for the same thread is replaced; a thread has at
    /// most one armed entry per queue. Among entries with equal fire
    /// ticks, insertion order is preserved (FIFO firing).
    pub fn arm(&mut self, thread: ThreadId, fire_at: u64, payload: T) {
        self.cancel(thread);
        let pos = self
            .entries
            .partition_point(|entry| entry.fire_at <= fire_at);
        self.entries.insert(
            pos,
            DelayedEvent {
                fire_at,
                thread,
                payload,
            },
        );
    }

    /// Cancels the armed entry for `thread`, if any
    ///
    /// Returns true when an entry was actually removed. Cancelling an
    /// inactive entry is a no-op.
    pub fn cancel(&mut self, thread: ThreadId) -> bool {
        match self.entries.iter().position(|entry| entry.thread == thread) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the earliest entry due at or before `now`
    ///
    /// Entries fire in tick order; a fired entry is consumed and can
    /// never fire again. Returns None when nothing is due.
    pub fn pop_due(&mut self, now: u64) -> Option<DelayedEvent<T>> {
        if self.entries.first()?.fire_at <= now {
            Some(self.entries.remove(0))
        } else {
            None
        }
    }

    /// Returns true if `thread` has an armed entry
    pub fn is_armed(&self, thread: ThreadId) -> bool {
        self.entries.iter().any(|entry| entry.thread == thread)
    }

    /// Returns the fire tick of the armed entry for `thread`, if any
    pub fn fire_tick(&self, thread: ThreadId) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.thread == thread)
            .map(|entry| entry.fire_at)
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of armed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are armed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Copy> Default for DelayedEventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
