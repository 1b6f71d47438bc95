//! Processing stages and their simulated durations.

use crate::errors::{PlantError, PlantResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One step in an orange's fixed processing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Fetched from the tree. Every item starts here.
    Fetched,
    /// Peeled.
    Peeled,
    /// Juice extracted.
    Squeezed,
    /// Juice bottled.
    Bottled,
    /// Fully processed. Terminal.
    Processed,
}

impl Stage {
    /// All stages in processing order.
    pub const ALL: [Self; 5] = [
        Self::Fetched,
        Self::Peeled,
        Self::Squeezed,
        Self::Bottled,
        Self::Processed,
    ];

    /// Number of stages, which is also the number of workers per plant.
    pub const COUNT: usize = Self::ALL.len();

    /// The stage new items are created in.
    pub const INITIAL: Self = Self::Fetched;

    /// The terminal stage.
    pub const TERMINAL: Self = Self::Processed;

    /// Zero-based position of this stage.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns true for the terminal stage.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns the stage that follows this one.
    ///
    /// `item_id` is only used to label the error.
    pub fn next(self, item_id: u64) -> PlantResult<Self> {
        Self::ALL
            .get(self.ordinal() + 1)
            .copied()
            .ok_or_else(|| PlantError::invalid_transition(item_id, self))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched => write!(f, "fetched"),
            Self::Peeled => write!(f, "peeled"),
            Self::Squeezed => write!(f, "squeezed"),
            Self::Bottled => write!(f, "bottled"),
            Self::Processed => write!(f, "processed"),
        }
    }
}

/// Simulated processing cost of each stage, in milliseconds.
///
/// Immutable once built; plants share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTable {
    /// Cost of the fetched stage.
    #[serde(default = "default_fetched_ms")]
    pub fetched_ms: u64,
    /// Cost of the peeled stage.
    #[serde(default = "default_peeled_ms")]
    pub peeled_ms: u64,
    /// Cost of the squeezed stage.
    #[serde(default = "default_squeezed_ms")]
    pub squeezed_ms: u64,
    /// Cost of the bottled stage.
    #[serde(default = "default_bottled_ms")]
    pub bottled_ms: u64,
    /// Cost of the processed stage.
    #[serde(default = "default_processed_ms")]
    pub processed_ms: u64,
}

fn default_fetched_ms() -> u64 {
    15
}

fn default_peeled_ms() -> u64 {
    38
}

fn default_squeezed_ms() -> u64 {
    29
}

fn default_bottled_ms() -> u64 {
    17
}

fn default_processed_ms() -> u64 {
    1
}

impl Default for StageTable {
    fn default() -> Self {
        Self {
            fetched_ms: default_fetched_ms(),
            peeled_ms: default_peeled_ms(),
            squeezed_ms: default_squeezed_ms(),
            bottled_ms: default_bottled_ms(),
            processed_ms: default_processed_ms(),
        }
    }
}

impl StageTable {
    /// Every stage costs the same number of milliseconds.
    #[must_use]
    pub fn uniform(millis: u64) -> Self {
        Self {
            fetched_ms: millis,
            peeled_ms: millis,
            squeezed_ms: millis,
            bottled_ms: millis,
            processed_ms: millis,
        }
    }

    /// Every stage completes without delay.
    #[must_use]
    pub fn instant() -> Self {
        Self::uniform(0)
    }

    /// Sets the cost of a single stage.
    #[must_use]
    pub fn with_cost(mut self, stage: Stage, millis: u64) -> Self {
        match stage {
            Stage::Fetched => self.fetched_ms = millis,
            Stage::Peeled => self.peeled_ms = millis,
            Stage::Squeezed => self.squeezed_ms = millis,
            Stage::Bottled => self.bottled_ms = millis,
            Stage::Processed => self.processed_ms = millis,
        }
        self
    }

    /// Cost of a stage in milliseconds.
    #[must_use]
    pub fn cost_ms(&self, stage: Stage) -> u64 {
        match stage {
            Stage::Fetched => self.fetched_ms,
            Stage::Peeled => self.peeled_ms,
            Stage::Squeezed => self.squeezed_ms,
            Stage::Bottled => self.bottled_ms,
            Stage::Processed => self.processed_ms,
        }
    }

    /// Cost of a stage as a `Duration`.
    #[must_use]
    pub fn cost(&self, stage: Stage) -> Duration {
        Duration::from_millis(self.cost_ms(stage))
    }

    /// The slowest stage bounds a plant's steady-state throughput.
    #[must_use]
    pub fn bottleneck(&self) -> Stage {
        Stage::ALL
            .into_iter()
            .max_by_key(|stage| self.cost_ms(*stage))
            .unwrap_or(Stage::INITIAL)
    }

    /// Total cost of taking one item from creation to the terminal stage.
    ///
    /// The initial stage is paid twice: once on creation and once when the
    /// first worker advances the item.
    #[must_use]
    pub fn end_to_end(&self) -> Duration {
        let advances: u64 = Stage::ALL
            .iter()
            .filter(|stage| !stage.is_terminal())
            .map(|stage| self.cost_ms(*stage))
            .sum();
        Duration::from_millis(self.cost_ms(Stage::INITIAL) + advances)
    }
}
