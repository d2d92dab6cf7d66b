//! # Tick Source
//!
//! Hardware abstraction for the monotonic tick counter.
//!
//! ## Philosophy
//!
//! **Time is a service, not a global variable.**
//!
//! The scheduling core performs all deadline and timeout arithmetic on a
//! monotonic tick counter that advances outside of it (in a real system,
//! via the timer interrupt). This trait provides read-only access to
//! that counter. It does NOT:
//! - Provide wall-clock time (no UTC, no timezones)
//! - Block or sleep (polling only)
//! - Fire callbacks (the core's delayed-event queues own that)
//!
//! ## Design Principles
//!
//! 1. **Monotonic**: Ticks never go backwards
//! 2. **Non-blocking**: Always returns immediately
//! 3. **Cumulative**: Returns total ticks since boot
//! 4. **Frequency-agnostic**: No assumptions about tick rate at this layer

/// Monotonic tick counter trait
///
/// Ticks are cumulative unsigned 64-bit counts and never decrease.
/// The core only reads the counter; advancing it is the environment's
/// job.
///
/// # Implementation Notes
///
/// - Must be monotonic (never return a smaller value)
/// - Must not block
/// - Tick frequency is implementation-defined
pub trait TickSource {
    /// Returns the current tick count
    ///
    /// This value is:
    /// - Monotonic (never decreases)
    /// - Cumulative (total ticks since boot or source initialization)
    /// - Non-blocking (returns immediately)
    fn current_ticks(&self) -> u64;
}
