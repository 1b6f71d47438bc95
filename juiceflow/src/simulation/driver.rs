//! Runs several independent plants side by side.

use super::report::{SimulationReport, SimulationTotals};
use crate::config::SimulationConfig;
use crate::core::PlantState;
use crate::errors::{PlantError, PlantResult};
use crate::observability::SpanTimer;
use crate::pipeline::Plant;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

/// A set of plants sharing one configuration and one run window.
///
/// Plants share no state; the simulation only starts, stops and joins them
/// together and sums their counters.
pub struct Simulation {
    config: SimulationConfig,
    plants: Vec<Plant>,
    run_id: Uuid,
    started: Option<(DateTime<Utc>, SpanTimer)>,
}

impl Simulation {
    /// Validates the configuration and builds the plants, numbered from 1.
    pub fn new(config: SimulationConfig) -> PlantResult<Self> {
        config.validate()?;
        let plants = (1..=config.plants)
            .map(|id| Plant::new(id, config.plant.clone()))
            .collect::<PlantResult<Vec<_>>>()?;

        Ok(Self {
            config,
            plants,
            run_id: Uuid::new_v4(),
            started: None,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The plants, in id order.
    #[must_use]
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Identifier reported for this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Starts every plant.
    ///
    /// Fails without side effects if any plant has already been started.
    /// If one plant fails to spawn its threads, the plants already running
    /// are stopped and the error is returned; [`join`](Self::join) still
    /// reaps them.
    pub fn start(&mut self) -> PlantResult<()> {
        if let Some(plant) = self.plants.iter().find(|p| p.state() != PlantState::Created) {
            return Err(PlantError::lifecycle(plant.id(), "start", plant.state()));
        }
        info!(run_id = %self.run_id, plants = self.plants.len(), "Starting simulation");
        self.started = Some((Utc::now(), SpanTimer::start("simulation")));

        for plant in &self.plants {
            if let Err(e) = plant.start() {
                warn!(plant_id = plant.id(), error = %e, "Plant failed to start");
                self.stop();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Requests every plant to stop. Does not wait.
    pub fn stop(&self) {
        info!(run_id = %self.run_id, "Stopping simulation");
        for plant in &self.plants {
            plant.stop();
        }
    }

    /// Joins every plant and aggregates their counters.
    ///
    /// All plants are joined even if one fails; the first failure is
    /// returned. Like [`Plant::join`], this hangs if called before
    /// [`stop`](Self::stop).
    pub fn join(&mut self) -> PlantResult<SimulationReport> {
        let mut reports = Vec::with_capacity(self.plants.len());
        let mut first_error = None;
        for plant in &self.plants {
            match plant.join() {
                Ok(report) => reports.push(report),
                Err(e) => {
                    reports.push(plant.report());
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let (started_at, timer) = self
            .started
            .take()
            .unwrap_or_else(|| (Utc::now(), SpanTimer::start("simulation")));
        let report = SimulationReport {
            run_id: self.run_id,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: timer.finish(),
            totals: SimulationTotals::from_plants(&reports),
            plants: reports,
        };

        info!(
            run_id = %report.run_id,
            produced = report.totals.produced,
            processed = report.totals.processed,
            bottles = report.totals.bottles,
            waste = report.totals.waste,
            "Simulation finished"
        );
        Ok(report)
    }

    /// Starts the plants, runs them for the configured duration, then stops
    /// and joins them.
    pub fn run(mut self) -> PlantResult<SimulationReport> {
        if let Err(e) = self.start() {
            let _ = self.join();
            return Err(e);
        }
        std::thread::sleep(self.config.run_for());
        self.stop();
        self.join()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("run_id", &self.run_id)
            .field("plants", &self.plants)
            .finish_non_exhaustive()
    }
}
