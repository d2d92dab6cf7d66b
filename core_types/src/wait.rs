//! Wait outcome reporting

use serde::{Deserialize, Serialize};

/// How a thread's most recent waiting episode ended
///
/// Messaging subsystems (ports, buffers, semaphores) read this after a
/// blocked call returns to distinguish a genuine signal from a timeout.
/// Exactly one of the two paths takes effect per waiting episode, so the
/// value is unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitResult {
    /// No waiting episode has completed yet
    Pending,
    /// The wait ended via an explicit wake-up
    Signaled,
    /// The wait ended because its timeout or suspension timer fired
    TimedOut,
}

impl WaitResult {
    /// Returns true if the episode ended in a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitResult::TimedOut)
    }
}
