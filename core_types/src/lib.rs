//! # Core Types
//!
//! This crate defines the fundamental types used throughout the
//! partitioned scheduling core.
//!
//! ## Philosophy
//!
//! Core types are designed with these principles:
//! - **Explicit over implicit**: Absolute ticks and tick durations are
//!   distinct types and cannot be confused.
//! - **Type safety first**: Thread identity, priority, and wait outcomes
//!   are newtypes, not raw integers reinterpreted by convention.
//! - **Determinism**: Nothing in this crate depends on wall-clock time.
//!
//! ## Key Types
//!
//! - [`ThreadId`]: Stable identifier for a thread within its partition
//! - [`PartitionId`]: Unique identifier for a partition
//! - [`Priority`]: Scheduling priority (higher value wins)
//! - [`TickInstant`] / [`TickDuration`]: Points and spans on the tick line
//! - [`WaitResult`]: How a waiting episode ended
//! - [`OperatingMode`]: Partition operating mode

pub mod ids;
pub mod mode;
pub mod priority;
pub mod time;
pub mod wait;

pub use ids::{PartitionId, ThreadId};
pub use mode::{OperatingMode, StartCondition};
pub use priority::Priority;
pub use time::{TickDuration, TickInstant};
pub use wait::WaitResult;
