//! Plant lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of a plant.
///
/// Plants move strictly forward through `Created → Running → Stopping →
/// Stopped` and are never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantState {
    /// Constructed, no threads spawned yet.
    Created,
    /// Producer and workers are running.
    Running,
    /// Stop was requested; threads are draining.
    Stopping,
    /// All threads have been joined.
    Stopped,
}

impl Default for PlantState {
    fn default() -> Self {
        Self::Created
    }
}

impl fmt::Display for PlantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

impl PlantState {
    /// Returns true once the plant can no longer make progress.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if threads may still be alive in this state.
    #[must_use]
    pub fn has_threads(&self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }
}
