//! Thread control blocks and the per-partition registry
//!
//! Threads live in a fixed arena owned by their partition: one record
//! per thread for the partition's lifetime, indexed by [`ThreadId`].
//! A thread is never destroyed individually; partition restart runs
//! every record back through the same initialization path creation uses.

use crate::delayed_event::TimeoutAction;
use crate::error::SchedError;
use core_types::{Priority, ThreadId, WaitResult};
use hal::StackRegion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical state of a thread
///
/// The `suspended` flag is deliberately *not* a state: it is an
/// orthogonal modifier that forces the thread out of the eligibility
/// list even while Runnable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadState {
    /// Initial state, and the state a restart cycle returns to
    Stopped,
    /// Ready to run (eligible unless suspended)
    Runnable,
    /// Waiting for a signal, a timeout, or the end of a timed suspension
    Waiting,
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Runnable => write!(f, "Runnable"),
            Self::Waiting => write!(f, "Waiting"),
        }
    }
}

/// Role of a thread within its partition
///
/// The main thread and the error-handler thread are scheduled specially
/// by the dispatcher and are permanently excluded from the eligibility
/// list regardless of their state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadKind {
    /// Ordinary application thread
    Standard,
    /// The partition's main (initialization) thread
    Main,
    /// The partition's error-handler thread
    ErrorHandler,
}

/// Which list a thread is currently linked into
///
/// A thread is in at most one list at a time: the eligibility list, a
/// generic wait queue owned by a messaging object, or neither. The
/// marker lives on the control block so stop/wake can unlink without
/// consulting every queue owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListMembership {
    /// Not in any list
    None,
    /// In the partition's eligibility list
    Eligible,
    /// In a wait queue owned by a messaging object
    WaitQueue,
}

/// Static description of a thread, supplied at creation
#[derive(Debug, Clone)]
pub struct ThreadSpec {
    /// Human-readable name, for status reporting
    pub name: String,
    /// Role within the partition
    pub kind: ThreadKind,
    /// Priority the thread is created with
    pub base_priority: Priority,
    /// Bytes of user stack to reserve from the partition's arena
    pub stack_size: u64,
}

impl ThreadSpec {
    /// Creates a spec for an ordinary thread
    pub fn new(name: impl Into<String>, base_priority: Priority, stack_size: u64) -> Self {
        Self {
            name: name.into(),
            kind: ThreadKind::Standard,
            base_priority,
            stack_size,
        }
    }

    /// Sets the thread's role
    pub fn with_kind(mut self, kind: ThreadKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Thread control block
///
/// One per thread, owned by the registry. Mutable scheduling state is
/// reset by [`Tcb::reinit`], which both creation and partition restart
/// go through.
#[derive(Debug, Clone)]
pub struct Tcb {
    /// Identifier (arena index)
    pub id: ThreadId,
    /// Human-readable name
    pub name: String,
    /// Role within the partition
    pub kind: ThreadKind,
    /// Priority the thread was created with
    pub base_priority: Priority,
    /// Priority scheduling currently uses
    pub current_priority: Priority,
    /// Logical state
    pub state: ThreadState,
    /// Orthogonal suspension flag
    pub suspended: bool,
    /// Which list the thread is linked into
    pub membership: ListMembership,
    /// How the most recent waiting episode ended
    pub wait_result: WaitResult,
    /// Armed timeout entry, mirrored from the timeout queue
    pub armed_timeout: Option<TimeoutAction>,
    /// Whether a deadline entry is armed for this thread
    pub deadline_armed: bool,
    /// Whether the thread is in an unrecoverable condition
    pub unrecoverable: bool,
    /// Stack region allocated at creation, kept across restarts
    pub stack: StackRegion,
}

impl Tcb {
    /// Builds a control block from its spec and allocated stack
    pub fn new(id: ThreadId, spec: &ThreadSpec, stack: StackRegion) -> Self {
        let mut tcb = Self {
            id,
            name: spec.name.clone(),
            kind: spec.kind,
            base_priority: spec.base_priority,
            current_priority: spec.base_priority,
            state: ThreadState::Stopped,
            suspended: false,
            membership: ListMembership::None,
            wait_result: WaitResult::Pending,
            armed_timeout: None,
            deadline_armed: false,
            unrecoverable: false,
            stack,
        };
        tcb.reinit();
        tcb
    }

    /// Resets all mutable scheduling state
    ///
    /// This is the single initialization path: creation runs through it,
    /// and partition restart runs every record through it again. The
    /// stack region and static attributes survive.
    pub fn reinit(&mut self) {
        self.current_priority = self.base_priority;
        self.state = ThreadState::Stopped;
        self.suspended = false;
        self.membership = ListMembership::None;
        self.wait_result = WaitResult::Pending;
        self.armed_timeout = None;
        self.deadline_armed = false;
        self.unrecoverable = false;
    }
}

/// Read-only status snapshot of one thread
///
/// The accessor surface the syscall layer marshals back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadStatus {
    /// Thread identifier
    pub id: ThreadId,
    /// Human-readable name
    pub name: String,
    /// Role within the partition
    pub kind: ThreadKind,
    /// Logical state
    pub state: ThreadState,
    /// Orthogonal suspension flag
    pub suspended: bool,
    /// Priority the thread was created with
    pub base_priority: Priority,
    /// Priority scheduling currently uses
    pub current_priority: Priority,
    /// How the most recent waiting episode ended
    pub wait_result: WaitResult,
}

/// Per-partition arena of thread control blocks
///
/// Records are appended at creation and indexed by [`ThreadId`];
/// nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct ThreadRegistry {
    threads: Vec<Tcb>,
}

impl ThreadRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            threads: Vec::new(),
        }
    }

    /// Registers a new thread and returns its identifier
    pub fn register(&mut self, spec: &ThreadSpec, stack: StackRegion) -> ThreadId {
        let id = ThreadId::from_index(self.threads.len() as u32);
        self.threads.push(Tcb::new(id, spec, stack));
        id
    }

    /// Returns the control block for `thread`
    pub fn get(&self, thread: ThreadId) -> Result<&Tcb, SchedError> {
        self.threads
            .get(thread.index())
            .ok_or(SchedError::ThreadNotFound(thread))
    }

    /// Returns the control block for `thread`, mutably
    pub fn get_mut(&mut self, thread: ThreadId) -> Result<&mut Tcb, SchedError> {
        self.threads
            .get_mut(thread.index())
            .ok_or(SchedError::ThreadNotFound(thread))
    }

    /// Returns the current priority of `thread`
    ///
    /// Threads in scheduler lists are always registered, so this is the
    /// lookup the eligibility list uses during insertion scans.
    pub fn priority_of(&self, thread: ThreadId) -> Priority {
        self.threads
            .get(thread.index())
            .map(|tcb| tcb.current_priority)
            .unwrap_or(Priority::MIN)
    }

    /// Iterates over all control blocks
    pub fn iter(&self) -> impl Iterator<Item = &Tcb> {
        self.threads.iter()
    }

    /// Iterates over all control blocks, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tcb> {
        self.threads.iter_mut()
    }

    /// Returns the number of registered threads
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Returns true if no thread is registered
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}
