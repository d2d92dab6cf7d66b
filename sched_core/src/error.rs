//! Scheduling core error types

use crate::thread::ThreadState;
use core_types::{OperatingMode, ThreadId};
use hal::StackError;
use thiserror::Error;

/// Errors returned at the directive boundary of the scheduling core
///
/// Two classes live here. `StackExhausted` and `InfiniteTimeout` are
/// recoverable, caller-visible conditions. Everything else is a caller
/// contract violation, reported as an error at the public boundary so a
/// hosting environment can choose to trap or to fail the call without
/// crashing the whole scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedError {
    /// No thread is registered under this identifier
    #[error("thread not found: {0}")]
    ThreadNotFound(ThreadId),

    /// The thread is in the wrong state for the directive
    #[error("{directive}: {thread} is {actual}")]
    InvalidState {
        /// Directive that was refused
        directive: &'static str,
        /// Target thread
        thread: ThreadId,
        /// State the thread was actually in
        actual: ThreadState,
    },

    /// The thread is already in the eligibility list
    #[error("{0} is already eligible")]
    AlreadyEligible(ThreadId),

    /// The thread is already linked into a wait queue
    #[error("{0} is already enqueued on a wait queue")]
    AlreadyWaitQueued(ThreadId),

    /// The directive requires the partition to be in NORMAL mode
    #[error("partition is in {0} mode, directive requires Normal")]
    NotInNormalMode(OperatingMode),

    /// A timed wait was requested with the infinite sentinel
    #[error("timed wait requires a finite deadline")]
    InfiniteTimeout,

    /// The partition's stack arena cannot satisfy the request
    #[error("stack allocation failed: {0}")]
    StackExhausted(#[from] StackError),

    /// The partition lock is not held by the given thread
    #[error("partition lock is not held by {0}")]
    LockNotHeld(ThreadId),
}
