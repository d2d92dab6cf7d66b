//! # Partition Operations
//!
//! Entry points a partition exposes to the dispatcher.
//!
//! A trait rather than a table of raw function pointers, so the set of
//! partition kinds is closed and typed. The scheduling core itself never
//! invokes these; the external dispatcher calls them at mode
//! transitions and when asynchronous partition events are pending. The
//! core only gates on the partition's current operating mode.

use core_types::{StartCondition, ThreadId};

/// A synchronous error attributed to a partition
///
/// Carries exactly what the error handler needs: which thread faulted
/// and where. Interpretation belongs to the health-monitor tables, not
/// to the scheduling core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionError {
    /// Faulting thread, when one can be attributed
    pub thread: Option<ThreadId>,
    /// Address at which the fault was observed, when known
    pub failed_address: Option<u64>,
}

/// Dispatcher-facing entry points of one partition
pub trait PartitionOps {
    /// Called when the partition is (re)started
    ///
    /// Runs with local preemption disabled.
    fn start(&mut self, condition: StartCondition);

    /// Called when an asynchronous event about the partition is pending
    ///
    /// Runs with local preemption disabled. The handler must consume the
    /// pending event state or it will be called again.
    fn on_event(&mut self);

    /// Processes a synchronous error related to the partition
    ///
    /// Runs with local preemption disabled.
    fn process_error(&mut self, error: PartitionError);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingOps {
        starts: u32,
        events: u32,
        errors: u32,
    }

    impl PartitionOps for CountingOps {
        fn start(&mut self, _condition: StartCondition) {
            self.starts += 1;
        }

        fn on_event(&mut self) {
            self.events += 1;
        }

        fn process_error(&mut self, _error: PartitionError) {
            self.errors += 1;
        }
    }

    #[test]
    fn test_ops_dispatch_through_trait_object() {
        let mut ops = CountingOps {
            starts: 0,
            events: 0,
            errors: 0,
        };
        let dyn_ops: &mut dyn PartitionOps = &mut ops;

        dyn_ops.start(StartCondition::NormalStart);
        dyn_ops.on_event();
        dyn_ops.process_error(PartitionError {
            thread: Some(ThreadId::from_index(0)),
            failed_address: None,
        });

        assert_eq!((ops.starts, ops.events, ops.errors), (1, 1, 1));
    }
}
