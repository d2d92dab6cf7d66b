//! # Partition Scheduling Core
//!
//! This crate implements the thread state machine, priority-ordered
//! eligibility mechanism, and deadline/timeout delayed-event subsystem
//! of a partitioned real-time kernel.
//!
//! ## Purpose
//!
//! Multiple isolated partitions share one processor under a
//! deterministic time line; within each partition a priority scheduler
//! selects which thread runs. This crate is that per-partition core:
//! it decides *who is eligible*, not *who physically runs*; the actual
//! context switch belongs to an external dispatcher that observes the
//! invalidation signal and the head of the eligibility list.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! Execution is single-core and cooperative. No operation here blocks
//! the caller; "wait" and "suspend" describe the *target* thread's
//! logical state. Time only moves when the environment advances it, so
//! every wake/timeout race is reproducible under `cargo test`.
//!
//! ## Key Pieces
//!
//! - [`PartitionScheduler`]: the state machine and directive surface
//! - [`EligibilityList`]: priority-ordered runnable threads
//! - [`TimeoutQueue`] / [`DeadlineQueue`]: delayed-event timers
//! - [`ThreadRegistry`]: per-partition arena of thread control blocks
//! - [`SimTickSource`]: deterministic tick source for tests

pub mod delayed_event;
pub mod eligibility;
pub mod error;
pub mod partition;
pub mod thread;
pub mod timer;

pub use delayed_event::{DeadlineQueue, DelayedEvent, TimeoutAction, TimeoutQueue};
pub use eligibility::EligibilityList;
pub use error::SchedError;
pub use partition::{PartitionConfig, PartitionScheduler, SchedEvent};
pub use thread::{
    ListMembership, Tcb, ThreadKind, ThreadRegistry, ThreadSpec, ThreadState, ThreadStatus,
};
pub use timer::SimTickSource;
