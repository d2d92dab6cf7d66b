//! Partition operating modes and start conditions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating mode of a partition
///
/// The scheduling core does not own mode transitions; it only gates on
/// the current value. Threads may be queued for execution only while the
/// partition is in [`OperatingMode::Normal`]: attempting to wait or
/// queue in any other mode is a caller contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingMode {
    /// Partition is not executing at all
    Idle,
    /// Initialization after a cold start; only the main thread runs
    ColdStart,
    /// Initialization after a warm restart; only the main thread runs
    WarmStart,
    /// Full operation: the eligibility list drives scheduling
    Normal,
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::ColdStart => write!(f, "ColdStart"),
            Self::WarmStart => write!(f, "WarmStart"),
            Self::Normal => write!(f, "Normal"),
        }
    }
}

/// Why a partition was (re)started
///
/// Reported to the partition's start entry point so initialization code
/// can distinguish first boot from the various restart escalations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartCondition {
    /// First start after module boot
    NormalStart,
    /// Restart requested by the partition itself
    PartitionRestart,
    /// Restart escalated by the module-level health monitor
    HmModuleRestart,
    /// Restart escalated by the partition-level health monitor
    HmPartitionRestart,
}
