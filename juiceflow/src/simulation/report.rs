//! Aggregated results of a simulation run.

use crate::pipeline::PlantReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Counters summed across every plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationTotals {
    /// Oranges accepted across all plants.
    pub produced: u64,
    /// Oranges fully processed across all plants.
    pub processed: u64,
    /// Bottles filled, summed per plant.
    pub bottles: u64,
    /// Oranges wasted across all plants.
    pub waste: u64,
}

impl SimulationTotals {
    /// Sums per-plant reports.
    ///
    /// Bottles are summed plant by plant: leftover oranges in one plant do
    /// not combine with another's.
    #[must_use]
    pub fn from_plants(plants: &[PlantReport]) -> Self {
        plants.iter().fold(Self::default(), |acc, plant| Self {
            produced: acc.produced + plant.produced,
            processed: acc.processed + plant.processed,
            bottles: acc.bottles + plant.bottles,
            waste: acc.waste + plant.waste,
        })
    }
}

/// The outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Unique identifier of this run.
    pub run_id: Uuid,
    /// When the plants were started.
    pub started_at: DateTime<Utc>,
    /// When the last plant was joined.
    pub finished_at: DateTime<Utc>,
    /// Wall-clock time from start to the last join.
    pub elapsed_ms: f64,
    /// Per-plant tallies, in plant order.
    pub plants: Vec<PlantReport>,
    /// Sums over `plants`.
    pub totals: SimulationTotals,
}

impl SimulationReport {
    /// Serializes the report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total provided/processed = {}/{}",
            self.totals.produced, self.totals.processed
        )?;
        write!(
            f,
            "Created {}, wasted {} oranges",
            self.totals.bottles, self.totals.waste
        )
    }
}
