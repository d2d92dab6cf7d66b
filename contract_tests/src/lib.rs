//! # Scheduling Contract Tests
//!
//! This crate provides "golden" tests for the scheduling core's
//! observable contracts to ensure they don't drift accidentally over
//! time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the contracts are written as code
//! - **Testability first**: contract tests fail when behavior changes
//! - **Mechanism not policy**: define what must be stable, not how to
//!   use it
//!
//! ## Structure
//!
//! - [`scheduling`]: eligibility ordering, invalidation, lock, modes
//! - [`timers`]: timeout/deadline arming, firing, and race outcomes
//! - [`snapshots`]: wire stability of serialized status and events

pub mod scheduling;
pub mod snapshots;
pub mod timers;

/// Common test helpers for driving a partition
pub mod test_helpers {
    use core_types::{OperatingMode, Priority, ThreadId};
    use sched_core::{PartitionScheduler, ThreadKind, ThreadSpec};
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use std::fmt::Debug;

    /// Creates a partition already switched to NORMAL mode, with a
    /// clean audit log
    pub fn normal_partition() -> PartitionScheduler {
        let mut part = PartitionScheduler::new();
        part.set_mode(OperatingMode::Normal)
            .expect("mode transition to Normal failed");
        part.clear_audit_log();
        part
    }

    /// Creates and starts a standard thread
    pub fn started_thread(part: &mut PartitionScheduler, name: &str, priority: u8) -> ThreadId {
        let thread = part
            .create(&ThreadSpec::new(name, Priority::new(priority), 1024))
            .expect("thread creation failed");
        part.start(thread).expect("thread start failed");
        thread
    }

    /// Creates (without starting) a thread of the given kind
    pub fn thread_of_kind(
        part: &mut PartitionScheduler,
        name: &str,
        priority: u8,
        kind: ThreadKind,
    ) -> ThreadId {
        part.create(&ThreadSpec::new(name, Priority::new(priority), 1024).with_kind(kind))
            .expect("thread creation failed")
    }

    /// Asserts the eligibility list order and the structural invariants
    pub fn assert_order(part: &PartitionScheduler, expected: &[ThreadId]) {
        assert_eq!(
            part.eligible_threads(),
            expected,
            "eligibility order drifted"
        );
        part.assert_invariants();
    }

    /// Asserts a value survives a JSON round-trip unchanged
    pub fn assert_json_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + Debug,
    {
        let json = serde_json::to_string(value).expect("serialization failed");
        let back: T = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(&back, value, "JSON round-trip drifted");
    }
}
