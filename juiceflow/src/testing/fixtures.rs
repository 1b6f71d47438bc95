//! Fixtures for running plants with compressed timings.

use crate::config::{PlantConfig, SimulationConfig};
use crate::core::StageTable;
use crate::pipeline::{Plant, PlantReport};
use std::time::Duration;

/// A plant configuration where every stage takes `millis`.
#[must_use]
pub fn uniform_plant(millis: u64) -> PlantConfig {
    PlantConfig::new().with_stages(StageTable::uniform(millis))
}

/// A simulation that finishes in tens of milliseconds.
#[must_use]
pub fn quick_simulation(plants: usize) -> SimulationConfig {
    SimulationConfig::new()
        .with_plants(plants)
        .with_run_for(Duration::from_millis(40))
        .with_plant(uniform_plant(1))
}

/// Starts a plant, lets it run for `run_for`, stops and joins it.
///
/// # Panics
///
/// Panics if the configuration is invalid or the plant fails.
#[must_use]
pub fn run_plant_for(id: usize, config: PlantConfig, run_for: Duration) -> PlantReport {
    let plant = Plant::new(id, config).unwrap_or_else(|e| panic!("invalid plant config: {e}"));
    plant
        .start()
        .unwrap_or_else(|e| panic!("plant {id} failed to start: {e}"));
    std::thread::sleep(run_for);
    plant.stop();
    plant
        .join()
        .unwrap_or_else(|e| panic!("plant {id} failed: {e}"))
}
