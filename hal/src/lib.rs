//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the abstraction traits the scheduling core
//! consumes from its environment.
//!
//! ## Philosophy
//!
//! **The core never reaches around its seams.**
//!
//! Everything the scheduling core needs from the outside world (time,
//! stack memory, fault escalation, partition entry points) comes in
//! through a trait defined here. Architecture- or deployment-specific
//! crates implement these traits; tests substitute deterministic ones.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: All environment access goes through traits
//! 2. **No hidden globals**: State is passed explicitly, never ambient
//! 3. **Testable**: Every trait has a trivial deterministic test double

pub mod health;
pub mod partition_ops;
pub mod stack;
pub mod timer;

pub use health::{HealthMonitor, RecordingHealthMonitor};
pub use partition_ops::{PartitionError, PartitionOps};
pub use stack::{StackArena, StackError, StackRegion};
pub use timer::TickSource;
