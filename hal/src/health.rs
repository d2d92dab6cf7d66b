//! # Health Monitor Escalation
//!
//! The scheduling core *detects* deadline overruns; it never decides
//! what to do about them. When a deadline timer fires, the core invokes
//! this hook exactly once with the thread identity and the tick at which
//! the overrun was observed. The policy (ignore, restart the thread,
//! restart the partition) lives entirely behind this trait.

use core_types::ThreadId;
use std::cell::RefCell;
use std::rc::Rc;

/// Escalation entry point for detected faults
///
/// Implementations must not call back into the scheduling core from
/// inside the hook; the core is mid-mutation when it fires.
pub trait HealthMonitor {
    /// A thread exceeded its time budget
    ///
    /// Called exactly once per deadline-timer firing.
    fn deadline_overrun(&mut self, thread: ThreadId, overrun_tick: u64);
}

/// Health monitor that records every escalation, for tests
///
/// Clones share one log: a harness hands one clone to the scheduler
/// and keeps another to inspect what fired.
#[derive(Debug, Clone, Default)]
pub struct RecordingHealthMonitor {
    overruns: Rc<RefCell<Vec<(ThreadId, u64)>>>,
}

impl RecordingHealthMonitor {
    /// Creates an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded overruns in firing order
    pub fn overruns(&self) -> Vec<(ThreadId, u64)> {
        self.overruns.borrow().clone()
    }
}

impl HealthMonitor for RecordingHealthMonitor {
    fn deadline_overrun(&mut self, thread: ThreadId, overrun_tick: u64) {
        self.overruns.borrow_mut().push((thread, overrun_tick));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_monitor_keeps_order() {
        let mut monitor = RecordingHealthMonitor::new();
        let t1 = ThreadId::from_index(1);
        let t2 = ThreadId::from_index(2);

        monitor.deadline_overrun(t2, 100);
        monitor.deadline_overrun(t1, 250);

        assert_eq!(monitor.overruns(), vec![(t2, 100), (t1, 250)]);
    }

    #[test]
    fn test_clones_share_the_log() {
        let handle = RecordingHealthMonitor::new();
        let mut given_away = handle.clone();

        given_away.deadline_overrun(ThreadId::from_index(0), 42);

        assert_eq!(handle.overruns(), vec![(ThreadId::from_index(0), 42)]);
    }
}
