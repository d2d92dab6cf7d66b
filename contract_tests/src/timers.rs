//! Timeout and deadline contracts
//!
//! Pins the delayed-event behavior the rest of the system depends on:
//! wake-versus-timeout mutual exclusion, suspension timers, deadline
//! supervision, and the tick-source plumbing.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use core_types::{TickDuration, TickInstant, WaitResult};
    use hal::{RecordingHealthMonitor, TickSource};
    use sched_core::{SchedEvent, SimTickSource, ThreadState};

    #[test]
    fn test_exactly_one_of_wake_or_timeout_takes_effect() {
        // Same arming, two futures: in one partition the wake arrives
        // first, in the other nothing arrives. Each episode must end
        // exactly once, with the matching wait result.
        let mut woken = normal_partition();
        let mut expired = normal_partition();
        let w = started_thread(&mut woken, "w", 5);
        let e = started_thread(&mut expired, "e", 5);

        woken.wait_timed(w, TickInstant::from_ticks(100)).unwrap();
        expired.wait_timed(e, TickInstant::from_ticks(100)).unwrap();

        woken.on_tick_advanced(50).unwrap();
        woken.wake_up(w).unwrap();
        woken.on_tick_advanced(50).unwrap();
        assert_eq!(woken.wait_result(w).unwrap(), WaitResult::Signaled);

        expired.on_tick_advanced(100).unwrap();
        assert_eq!(expired.wait_result(e).unwrap(), WaitResult::TimedOut);

        // The loser of the race left no trace: no stray TimeoutFired in
        // the woken partition, no second transition in the expired one.
        assert!(!woken
            .audit_log()
            .iter()
            .any(|e| matches!(e, SchedEvent::TimeoutFired { .. })));
        assert_eq!(
            expired
                .audit_log()
                .iter()
                .filter(|e| matches!(e, SchedEvent::TimeoutFired { .. }))
                .count(),
            1
        );
        woken.assert_invariants();
        expired.assert_invariants();
    }

    #[test]
    fn test_timeout_unlinks_from_wait_queue() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);

        part.wait_timed(thread, TickInstant::from_ticks(30)).unwrap();
        part.enqueue_wait(thread).unwrap();
        part.on_tick_advanced(30).unwrap();

        // The queue owner discovers the thread already left.
        assert!(!part.dequeue_wait(thread).unwrap());
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Runnable);
        part.assert_invariants();
    }

    #[test]
    fn test_timed_suspension_full_cycle() {
        // suspend_timed(T, 100) at tick 0: at tick 100 the thread is
        // Runnable, unsuspended, back at its priority position, with a
        // timeout result.
        let mut part = normal_partition();
        let filler = started_thread(&mut part, "filler", 5);
        let thread = started_thread(&mut part, "worker", 9);

        part.suspend_timed(thread, TickDuration::from_ticks(100))
            .unwrap();
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Waiting);
        assert!(part.is_suspended(thread).unwrap());
        assert_order(&part, &[filler]);

        part.on_tick_advanced(100).unwrap();
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Runnable);
        assert!(!part.is_suspended(thread).unwrap());
        assert_eq!(part.wait_result(thread).unwrap(), WaitResult::TimedOut);
        assert_order(&part, &[thread, filler]);
    }

    #[test]
    fn test_resume_cancels_suspension_timer() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);

        part.suspend_timed(thread, TickDuration::from_ticks(100))
            .unwrap();
        part.resume(thread).unwrap();
        assert_eq!(part.wait_result(thread).unwrap(), WaitResult::Signaled);

        part.clear_audit_log();
        part.on_tick_advanced(200).unwrap();
        assert!(part.audit_log().is_empty(), "cancelled timer fired");
        part.assert_invariants();
    }

    #[test]
    fn test_deadline_supervision_is_orthogonal_to_state() {
        let monitor = RecordingHealthMonitor::new();
        let mut part = sched_core::PartitionScheduler::new()
            .with_health_monitor(Box::new(monitor.clone()));
        part.set_mode(core_types::OperatingMode::Normal).unwrap();
        let thread = started_thread(&mut part, "worker", 5);

        // Deadline and timeout armed at once on the same thread.
        part.set_deadline(thread, TickInstant::from_ticks(80)).unwrap();
        part.wait_timed(thread, TickInstant::from_ticks(40)).unwrap();

        part.on_tick_advanced(40).unwrap();
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Runnable);
        assert!(monitor.overruns().is_empty());

        part.on_tick_advanced(40).unwrap();
        assert_eq!(monitor.overruns(), vec![(thread, 80)]);
        assert_eq!(
            part.state_of(thread).unwrap(),
            ThreadState::Runnable,
            "overrun must not change thread state"
        );
        part.assert_invariants();
    }

    #[test]
    fn test_rearming_deadline_replaces_prior() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);

        part.set_deadline(thread, TickInstant::from_ticks(50)).unwrap();
        part.set_deadline(thread, TickInstant::from_ticks(300)).unwrap();

        part.on_tick_advanced(100).unwrap();
        assert!(!part
            .audit_log()
            .iter()
            .any(|e| matches!(e, SchedEvent::DeadlineOverrun { .. })));

        part.on_tick_advanced(200).unwrap();
        assert_eq!(
            part.audit_log()
                .iter()
                .filter(|e| matches!(e, SchedEvent::DeadlineOverrun { deadline_tick: 300, .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_stop_disarms_everything() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);

        part.set_deadline(thread, TickInstant::from_ticks(60)).unwrap();
        part.wait_timed(thread, TickInstant::from_ticks(40)).unwrap();
        part.stop(thread).unwrap();

        part.clear_audit_log();
        part.on_tick_advanced(1_000).unwrap();
        assert!(part.audit_log().is_empty());
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Stopped);
    }

    #[test]
    fn test_advance_to_follows_a_tick_source() {
        let mut source = SimTickSource::new();
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);
        part.wait_timed(thread, TickInstant::from_ticks(75)).unwrap();

        source.advance_ticks(50);
        part.advance_to(source.current_ticks()).unwrap();
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Waiting);

        source.advance_ticks(25);
        part.advance_to(source.current_ticks()).unwrap();
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Runnable);
        assert_eq!(part.current_ticks(), 75);

        // A stale poll advances by zero and changes nothing.
        part.advance_to(10).unwrap();
        assert_eq!(part.current_ticks(), 75);
    }
}
