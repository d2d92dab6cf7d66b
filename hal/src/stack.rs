//! # Stack Arena
//!
//! Per-partition arena that execution stacks are carved out of.
//!
//! Each partition owns a fixed block of stack memory sized at
//! deployment. Thread creation consumes a slice of it; the arena is
//! never compacted and individual stacks are never freed, because
//! threads live for the partition's whole lifetime. A partition restart
//! reuses the regions allocated at first load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stack region handed out by the arena
///
/// `base` is an offset into the partition's stack block, not a machine
/// address; the architecture layer maps it when the thread first runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRegion {
    /// Offset of the region within the partition's stack block
    pub base: u64,
    /// Size of the region in bytes
    pub size: u64,
}

/// Errors from stack allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    /// The arena cannot satisfy the request
    #[error("stack arena exhausted: requested {requested} bytes, {remaining} remaining")]
    Exhausted {
        /// Bytes requested
        requested: u64,
        /// Bytes left in the arena
        remaining: u64,
    },
}

/// Bump allocator over a partition's stack block
///
/// Deterministic and trivially inspectable: allocation advances a
/// watermark, nothing else.
#[derive(Debug, Clone)]
pub struct StackArena {
    capacity: u64,
    used: u64,
}

impl StackArena {
    /// Creates an arena over `capacity` bytes of stack memory
    pub fn new(capacity: u64) -> Self {
        Self { capacity, used: 0 }
    }

    /// Allocates a stack region of `size` bytes
    ///
    /// Fails when fewer than `size` bytes remain. A failed allocation
    /// leaves the arena unchanged.
    pub fn allocate(&mut self, size: u64) -> Result<StackRegion, StackError> {
        let remaining = self.capacity - self.used;
        if size > remaining {
            return Err(StackError::Exhausted {
                requested: size,
                remaining,
            });
        }
        let region = StackRegion {
            base: self.used,
            size,
        };
        self.used += size;
        Ok(region)
    }

    /// Returns the number of unallocated bytes
    pub fn remaining_bytes(&self) -> u64 {
        self.capacity - self.used
    }

    /// Returns the arena capacity in bytes
    pub fn capacity_bytes(&self) -> u64 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_advances_watermark() {
        let mut arena = StackArena::new(4096);
        let r1 = arena.allocate(1024).unwrap();
        let r2 = arena.allocate(2048).unwrap();

        assert_eq!(r1, StackRegion { base: 0, size: 1024 });
        assert_eq!(
            r2,
            StackRegion {
                base: 1024,
                size: 2048
            }
        );
        assert_eq!(arena.remaining_bytes(), 1024);
    }

    #[test]
    fn test_exhaustion_reports_remaining() {
        let mut arena = StackArena::new(1000);
        arena.allocate(900).unwrap();

        let err = arena.allocate(200).unwrap_err();
        assert_eq!(
            err,
            StackError::Exhausted {
                requested: 200,
                remaining: 100
            }
        );
        // Failed allocation must not consume anything.
        assert_eq!(arena.remaining_bytes(), 100);
    }

    #[test]
    fn test_exact_fit_succeeds() {
        let mut arena = StackArena::new(512);
        assert!(arena.allocate(512).is_ok());
        assert_eq!(arena.remaining_bytes(), 0);
    }
}
