//! Eligibility, invalidation, lock, and mode contracts
//!
//! These tests pin the scheduling decisions an external dispatcher
//! depends on: the order of the eligibility list, exactly when the
//! invalidation signal is raised, and how mode transitions and the
//! partition lock interact with both.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use core_types::{OperatingMode, Priority, StartCondition, TickInstant};
    use sched_core::{SchedError, ThreadKind, ThreadState};

    #[test]
    fn test_eligibility_is_priority_then_fifo() {
        // The canonical ordering scenario: A(5), B(10), C(5) started in
        // that order must yield [B, A, C]: priority first, FIFO within
        // a tier.
        let mut part = normal_partition();
        let a = started_thread(&mut part, "a", 5);
        let b = started_thread(&mut part, "b", 10);
        let c = started_thread(&mut part, "c", 5);

        assert_order(&part, &[b, a, c]);
    }

    #[test]
    fn test_eligibility_matches_predicate_after_every_directive() {
        // After any directive, a standard thread is eligible exactly
        // when it is Runnable, not suspended, and the partition is in
        // NORMAL mode. assert_invariants checks that equivalence.
        let mut part = normal_partition();
        let a = started_thread(&mut part, "a", 5);
        let b = started_thread(&mut part, "b", 7);

        part.suspend(a).unwrap();
        part.assert_invariants();
        part.wait(b).unwrap();
        part.assert_invariants();
        part.resume(a).unwrap();
        part.assert_invariants();
        part.wake_up(b).unwrap();
        part.assert_invariants();
        part.stop(a).unwrap();
        part.assert_invariants();
        part.set_mode(OperatingMode::Idle).unwrap();
        part.assert_invariants();
    }

    #[test]
    fn test_invalidation_raised_only_on_head_change() {
        let mut part = normal_partition();
        let a = started_thread(&mut part, "a", 10);
        assert!(part.take_invalidation(), "first insert changes the head");

        started_thread(&mut part, "b", 5);
        assert!(
            !part.take_invalidation(),
            "lower-priority insert leaves the head alone"
        );

        let c = started_thread(&mut part, "c", 20);
        assert!(part.take_invalidation(), "higher-priority insert displaces");

        part.stop(c).unwrap();
        assert!(part.take_invalidation(), "head removal invalidates");
        assert_eq!(part.eligible_head(), Some(a));
    }

    #[test]
    fn test_stopping_lock_holder_invalidates_even_off_head() {
        let mut part = normal_partition();
        let head = started_thread(&mut part, "head", 10);
        let holder = started_thread(&mut part, "holder", 1);

        part.inc_lock_level(holder).unwrap();
        part.take_invalidation();
        assert_eq!(part.eligible_head(), Some(head));

        part.stop(holder).unwrap();
        assert_eq!(part.lock_level(), 0);
        assert!(
            part.take_invalidation(),
            "lock force-release must invalidate"
        );
    }

    #[test]
    fn test_lock_release_at_zero_invalidates() {
        let mut part = normal_partition();
        let holder = started_thread(&mut part, "holder", 5);

        part.inc_lock_level(holder).unwrap();
        part.inc_lock_level(holder).unwrap();
        part.take_invalidation();

        assert_eq!(part.dec_lock_level(holder).unwrap(), 1);
        assert!(!part.take_invalidation(), "still held at level 1");
        assert_eq!(part.dec_lock_level(holder).unwrap(), 0);
        assert!(part.take_invalidation(), "release to zero invalidates");
    }

    #[test]
    fn test_main_and_error_handler_never_join_the_list() {
        let mut part = normal_partition();
        let main = thread_of_kind(&mut part, "main", 250, ThreadKind::Main);
        let handler = thread_of_kind(&mut part, "handler", 250, ThreadKind::ErrorHandler);
        let worker = started_thread(&mut part, "worker", 1);

        part.start(main).unwrap();
        part.start(handler).unwrap();
        assert_order(&part, &[worker]);

        // Still excluded after a mode round-trip requeues everyone.
        part.set_mode(OperatingMode::Idle).unwrap();
        part.set_mode(OperatingMode::Normal).unwrap();
        assert_order(&part, &[worker]);
    }

    #[test]
    fn test_yield_round_robins_within_tier() {
        let mut part = normal_partition();
        let a = started_thread(&mut part, "a", 5);
        let b = started_thread(&mut part, "b", 5);
        let c = started_thread(&mut part, "c", 5);

        part.yield_thread(a).unwrap();
        assert_order(&part, &[b, c, a]);
        part.yield_thread(b).unwrap();
        assert_order(&part, &[c, a, b]);
        part.yield_thread(c).unwrap();
        assert_order(&part, &[a, b, c]);
    }

    #[test]
    fn test_set_priority_moves_to_new_tier_tail() {
        let mut part = normal_partition();
        let a = started_thread(&mut part, "a", 5);
        let b = started_thread(&mut part, "b", 10);
        let c = started_thread(&mut part, "c", 10);

        part.set_priority(a, Priority::new(10)).unwrap();
        assert_order(&part, &[b, c, a]);
    }

    #[test]
    fn test_leaving_normal_empties_list() {
        let mut part = normal_partition();
        let a = started_thread(&mut part, "a", 5);
        let b = started_thread(&mut part, "b", 10);

        part.set_mode(OperatingMode::WarmStart).unwrap();
        assert_order(&part, &[]);
        assert_eq!(part.state_of(a).unwrap(), ThreadState::Runnable);

        part.set_mode(OperatingMode::Normal).unwrap();
        assert_order(&part, &[b, a]);
    }

    #[test]
    fn test_directive_errors_leave_state_untouched() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);
        let order_before = part.eligible_threads();

        assert!(matches!(
            part.start(thread).unwrap_err(),
            SchedError::InvalidState { .. }
        ));
        assert!(matches!(
            part.wake_up(thread).unwrap_err(),
            SchedError::InvalidState { .. }
        ));
        assert!(matches!(
            part.wait_timed(thread, TickInstant::INFINITE).unwrap_err(),
            SchedError::InfiniteTimeout
        ));

        assert_order(&part, &order_before);
        assert_eq!(part.state_of(thread).unwrap(), ThreadState::Runnable);
    }

    #[test]
    fn test_restart_returns_every_thread_to_stopped() {
        let mut part = normal_partition();
        let a = started_thread(&mut part, "a", 5);
        let b = started_thread(&mut part, "b", 10);
        part.wait_timed(a, TickInstant::from_ticks(50)).unwrap();
        part.inc_lock_level(b).unwrap();

        part.restart(StartCondition::PartitionRestart).unwrap();

        assert_eq!(part.mode(), OperatingMode::WarmStart);
        assert_eq!(part.state_of(a).unwrap(), ThreadState::Stopped);
        assert_eq!(part.state_of(b).unwrap(), ThreadState::Stopped);
        assert_eq!(part.lock_level(), 0);
        assert_order(&part, &[]);

        // The partition can be brought back up through the same path.
        part.start(a).unwrap();
        part.set_mode(OperatingMode::Normal).unwrap();
        assert_order(&part, &[a]);
    }
}
