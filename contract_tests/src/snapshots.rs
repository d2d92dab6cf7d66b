//! Wire stability of serialized scheduling state
//!
//! Status snapshots and audit events cross the partition boundary to
//! monitoring tooling; their JSON shape is a contract. These tests pin
//! the exact field names and tagging so renames fail loudly.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use core_types::{StartCondition, TickInstant, WaitResult};
    use sched_core::SchedEvent;
    use serde_json::json;

    #[test]
    fn test_thread_status_field_contract() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);

        let status = part.thread_status(thread).unwrap();
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 0,
                "name": "worker",
                "kind": "Standard",
                "state": "Runnable",
                "suspended": false,
                "base_priority": 5,
                "current_priority": 5,
                "wait_result": "Pending",
            })
        );
    }

    #[test]
    fn test_thread_status_round_trip() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);
        part.wait_timed(thread, TickInstant::from_ticks(10)).unwrap();
        part.on_tick_advanced(10).unwrap();

        let status = part.thread_status(thread).unwrap();
        assert_eq!(status.wait_result, WaitResult::TimedOut);
        assert_json_round_trip(&status);
    }

    #[test]
    fn test_audit_event_tagging_contract() {
        let event = SchedEvent::DeadlineOverrun {
            thread: core_types::ThreadId::from_index(2),
            deadline_tick: 100,
            timestamp_ticks: 150,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "DeadlineOverrun": {
                    "thread": 2,
                    "deadline_tick": 100,
                    "timestamp_ticks": 150,
                }
            })
        );
    }

    #[test]
    fn test_restart_event_carries_condition() {
        let mut part = normal_partition();
        part.restart(StartCondition::HmModuleRestart).unwrap();

        let json = serde_json::to_string(part.audit_log()).unwrap();
        let back: Vec<SchedEvent> = serde_json::from_str(&json).unwrap();
        assert!(back.iter().any(|e| matches!(
            e,
            SchedEvent::PartitionRestarted {
                condition: StartCondition::HmModuleRestart,
                ..
            }
        )));
    }

    #[test]
    fn test_full_audit_log_round_trip() {
        let mut part = normal_partition();
        let thread = started_thread(&mut part, "worker", 5);
        part.wait_timed(thread, TickInstant::from_ticks(20)).unwrap();
        part.on_tick_advanced(20).unwrap();
        part.stop(thread).unwrap();

        assert_json_round_trip(&part.audit_log().to_vec());
    }
}
