//! Per-plant production counters.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between a plant and its threads.
///
/// `produced` is written only by the producer and `processed` only by the
/// completion sink. Reads are race-free at any time but only final after the
/// plant has been joined.
#[derive(Debug, Default)]
pub struct PlantCounters {
    produced: AtomicU64,
    processed: AtomicU64,
}

impl PlantCounters {
    /// Records an item accepted by the first channel.
    pub fn record_produced(&self) {
        self.produced.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an item that reached the terminal stage.
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of produced items.
    #[must_use]
    pub fn produced(&self) -> u64 {
        self.produced.load(Ordering::Relaxed)
    }

    /// Returns the number of fully processed items.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Takes a snapshot. Exact once the plant is joined, approximate before.
    #[must_use]
    pub fn snapshot(&self, plant_id: usize, items_per_bottle: u64) -> PlantReport {
        let processed = self.processed();
        let produced = self.produced();
        PlantReport::new(plant_id, produced, processed, items_per_bottle)
    }
}

/// Final tallies for one plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlantReport {
    /// Plant identifier.
    pub plant_id: usize,
    /// Oranges accepted into the plant.
    pub produced: u64,
    /// Oranges that reached the terminal stage.
    pub processed: u64,
    /// Whole bottles filled.
    pub bottles: u64,
    /// Oranges produced but never processed.
    pub waste: u64,
}

impl PlantReport {
    /// Builds a report, deriving bottles and waste.
    #[must_use]
    pub fn new(plant_id: usize, produced: u64, processed: u64, items_per_bottle: u64) -> Self {
        Self {
            plant_id,
            produced,
            processed,
            bottles: processed / items_per_bottle.max(1),
            waste: produced.saturating_sub(processed),
        }
    }

    /// Returns true when `produced == processed + waste`.
    ///
    /// Guaranteed only for reports taken after the plant is joined.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.produced == self.processed + self.waste
    }
}
