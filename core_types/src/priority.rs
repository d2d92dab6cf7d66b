//! Scheduling priority

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduling priority of a thread
///
/// Higher values are more urgent. The eligibility list is kept sorted by
/// non-increasing priority; threads of equal priority run round-robin in
/// the order they became eligible.
///
/// A thread carries two priorities: the base priority it was created
/// with, and the current priority that scheduling actually uses. The
/// current priority is reset to the base priority whenever the thread is
/// (re)initialized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Priority(u8);

impl Priority {
    /// The lowest possible priority
    pub const MIN: Priority = Priority(u8::MIN);

    /// The highest possible priority
    pub const MAX: Priority = Priority(u8::MAX);

    /// Creates a priority from a raw level
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Returns the raw priority level
    pub const fn level(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::new(10) > Priority::new(5));
        assert!(Priority::new(0) < Priority::new(1));
        assert_eq!(Priority::new(7), Priority::new(7));
    }

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::MAX >= Priority::new(200));
        assert!(Priority::MIN <= Priority::new(0));
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(format!("{}", Priority::new(42)), "42");
    }
}
