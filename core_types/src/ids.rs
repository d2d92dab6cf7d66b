//! Unique identifiers for scheduling entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier for a thread within its partition
///
/// Threads live in a fixed-size per-partition arena for the partition's
/// whole lifetime, so the identifier is simply the arena index. A thread
/// is never destroyed individually; partition restart reinitializes the
/// record behind the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(u32);

impl ThreadId {
    /// Creates a thread ID from an arena index
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Returns the arena index
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread({})", self.0)
    }
}

/// Unique identifier for a partition
///
/// Partitions are isolated scheduling domains, each with its own thread
/// set, priority space, and operating mode. The set of partitions is
/// fixed at deployment; identifiers exist so state belonging to
/// different partitions can never be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionId(Uuid);

impl PartitionId {
    /// Creates a new random partition ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a partition ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PartitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Partition({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_index_round_trip() {
        let id = ThreadId::from_index(7);
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn test_thread_id_display() {
        let id = ThreadId::from_index(3);
        assert_eq!(format!("{}", id), "Thread(3)");
    }

    #[test]
    fn test_partition_id_creation() {
        let id1 = PartitionId::new();
        let id2 = PartitionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_partition_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = PartitionId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn test_partition_id_display() {
        let id = PartitionId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("Partition("));
    }

    #[test]
    fn test_thread_id_serde_round_trip() {
        let id = ThreadId::from_index(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: ThreadId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
