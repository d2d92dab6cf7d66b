//! Tick-based time abstractions
//!
//! All deadline and timeout arithmetic in the scheduling core runs on a
//! monotonic tick counter that advances externally (in a real system,
//! via the timer interrupt). These types keep absolute points and spans
//! on that tick line distinct.

use core::ops::{Add, Sub};
use serde::{Deserialize, Serialize};

/// An absolute point on the monotonic tick line
///
/// Ticks are unsigned 64-bit counts since partition-set boot. The value
/// `u64::MAX` is reserved as the "infinite" sentinel, used by callers to
/// express "no timeout" or "no deadline". Operations that require a
/// finite instant reject the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickInstant {
    /// Ticks since boot
    ticks: u64,
}

impl TickInstant {
    /// The "infinite" sentinel: later than every finite instant
    pub const INFINITE: TickInstant = TickInstant { ticks: u64::MAX };

    /// Creates an instant from a raw tick count
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Returns the raw tick count
    pub const fn as_ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns true if this is the infinite sentinel
    pub const fn is_infinite(&self) -> bool {
        self.ticks == u64::MAX
    }

    /// Returns the span since an earlier instant
    pub fn duration_since(&self, earlier: TickInstant) -> TickDuration {
        TickDuration::from_ticks(self.ticks.saturating_sub(earlier.ticks))
    }
}

impl Add<TickDuration> for TickInstant {
    type Output = TickInstant;

    fn add(self, duration: TickDuration) -> Self::Output {
        TickInstant::from_ticks(self.ticks.saturating_add(duration.as_ticks()))
    }
}

impl Sub<TickDuration> for TickInstant {
    type Output = TickInstant;

    fn sub(self, duration: TickDuration) -> Self::Output {
        TickInstant::from_ticks(self.ticks.saturating_sub(duration.as_ticks()))
    }
}

/// A span of ticks
///
/// Explicit and type-safe: a duration can never be mistaken for an
/// absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickDuration {
    /// Number of ticks
    ticks: u64,
}

impl TickDuration {
    /// The zero-length span
    pub const ZERO: TickDuration = TickDuration { ticks: 0 };

    /// Creates a duration from a raw tick count
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Returns the raw tick count
    pub const fn as_ticks(&self) -> u64 {
        self.ticks
    }
}

impl Add for TickDuration {
    type Output = TickDuration;

    fn add(self, other: TickDuration) -> Self::Output {
        TickDuration::from_ticks(self.ticks.saturating_add(other.ticks))
    }
}

impl Sub for TickDuration {
    type Output = TickDuration;

    fn sub(self, other: TickDuration) -> Self::Output {
        TickDuration::from_ticks(self.ticks.saturating_sub(other.ticks))
    }
}
