//! Deterministic tick source for tests and hosted simulation
//!
//! Wraps a manually-advanced counter behind [`hal::TickSource`] so a
//! harness can drive a [`crate::PartitionScheduler`] through
//! [`crate::PartitionScheduler::advance_to`] with full control over
//! when time moves.

use hal::TickSource;

/// Manually-advanced monotonic tick counter
///
/// Time only moves when the harness calls
/// [`SimTickSource::advance_ticks`] or [`SimTickSource::set_ticks`],
/// which is what makes every timeout race reproducible.
#[derive(Debug, Clone, Default)]
pub struct SimTickSource {
    ticks: u64,
}

impl SimTickSource {
    /// Creates a source at tick zero
    pub fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Creates a source at a given tick
    pub fn starting_at(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Advances the counter by `delta` ticks
    ///
    /// Panics on overflow; a harness that wraps a u64 tick counter has
    /// a broken scenario, not a scheduling problem.
    pub fn advance_ticks(&mut self, delta: u64) {
        self.ticks = self
            .ticks
            .checked_add(delta)
            .unwrap_or_else(|| panic!("tick counter overflow: {} + {}", self.ticks, delta));
    }

    /// Sets the counter to an absolute value
    ///
    /// The counter is monotonic; moving it backwards is a harness bug.
    pub fn set_ticks(&mut self, ticks: u64) {
        assert!(
            ticks >= self.ticks,
            "tick counter must not go backwards: {} -> {}",
            self.ticks,
            ticks
        );
        self.ticks = ticks;
    }
}

impl TickSource for SimTickSource {
    fn current_ticks(&self) -> u64 {
        self.ticks
    }
}
