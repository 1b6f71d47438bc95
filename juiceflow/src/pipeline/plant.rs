//! A juice plant: one producer feeding a chain of stage workers.

use super::counters::{PlantCounters, PlantReport};
use super::worker::{Mailbox, Producer, Worker};
use crate::cancellation::CancellationToken;
use crate::config::{DrainPolicy, PlantConfig};
use crate::core::{PlantState, Stage, StageTable};
use crate::errors::{PlantError, PlantResult};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

struct NamedHandle {
    name: String,
    handle: JoinHandle<PlantResult<()>>,
}

/// One independent plant.
///
/// The plant owns one inbound channel per worker. Worker `i` takes from
/// channel `i`, advances the orange one stage and hands it to channel `i + 1`.
/// The last worker receives fully processed oranges and counts them. A
/// producer thread feeds channel 0.
///
/// Lifecycle: [`start`](Self::start), [`stop`](Self::stop),
/// [`join`](Self::join), each once. Plants cannot be restarted.
pub struct Plant {
    id: usize,
    config: PlantConfig,
    table: Arc<StageTable>,
    channels: Vec<Arc<Mailbox>>,
    running: Arc<CancellationToken>,
    counters: Arc<PlantCounters>,
    state: Mutex<PlantState>,
    threads: Mutex<Vec<NamedHandle>>,
}

impl Plant {
    /// Creates a plant with the default configuration.
    #[must_use]
    pub fn create(id: usize) -> Self {
        Self::build(id, PlantConfig::default())
    }

    /// Creates a plant with the given configuration.
    pub fn new(id: usize, config: PlantConfig) -> PlantResult<Self> {
        config.validate()?;
        Ok(Self::build(id, config))
    }

    fn build(id: usize, config: PlantConfig) -> Self {
        let channels: Vec<Arc<Mailbox>> = (0..Stage::COUNT).map(|_| Arc::new(Mailbox::new())).collect();
        let running = Arc::new(CancellationToken::new());

        match config.drain {
            DrainPolicy::Discard => {
                let all = channels.clone();
                running.on_cancel(move || {
                    for channel in &all {
                        channel.signal_stop();
                    }
                });
            }
            DrainPolicy::Cascade => {
                let first = Arc::clone(&channels[0]);
                running.on_cancel(move || first.signal_stop());
            }
        }

        Self {
            id,
            table: Arc::new(config.stages.clone()),
            config,
            channels,
            running,
            counters: Arc::new(PlantCounters::default()),
            state: Mutex::new(PlantState::Created),
            threads: Mutex::new(Vec::new()),
        }
    }

    /// Spawns the worker threads and the producer thread.
    ///
    /// Fails if the plant was already started, or if a thread cannot be
    /// spawned. In the latter case the plant is left stopping and
    /// [`join`](Self::join) reaps whatever was spawned.
    pub fn start(&self) -> PlantResult<()> {
        let mut state = self.state.lock();
        if *state != PlantState::Created {
            return Err(PlantError::lifecycle(self.id, "start", *state));
        }
        info!(plant_id = self.id, drain = %self.config.drain, "Starting plant");

        if let Err(e) = self.spawn_all() {
            warn!(plant_id = self.id, error = %e, "Failed to spawn plant threads");
            self.running.cancel("thread spawn failed");
            for channel in &self.channels {
                channel.signal_stop();
            }
            *state = PlantState::Stopping;
            return Err(e);
        }

        *state = PlantState::Running;
        Ok(())
    }

    fn spawn_all(&self) -> PlantResult<()> {
        for index in 0..Stage::COUNT {
            let worker = Worker {
                plant_id: self.id,
                index,
                inbound: Arc::clone(&self.channels[index]),
                outbound: self.channels.get(index + 1).cloned(),
                counters: Arc::clone(&self.counters),
            };
            self.spawn(format!("plant-{}-worker-{index}", self.id), move || worker.run())?;
            debug!(plant_id = self.id, worker = index, "Worker started");
        }

        let producer = Producer {
            plant_id: self.id,
            first: Arc::clone(&self.channels[0]),
            table: Arc::clone(&self.table),
            running: Arc::clone(&self.running),
            counters: Arc::clone(&self.counters),
        };
        self.spawn(format!("plant-{}-producer", self.id), move || producer.run())
    }

    fn spawn<F>(&self, name: String, body: F) -> PlantResult<()>
    where
        F: FnOnce() -> PlantResult<()> + Send + 'static,
    {
        let handle = thread::Builder::new().name(name.clone()).spawn(body)?;
        self.threads.lock().push(NamedHandle { name, handle });
        Ok(())
    }

    /// Requests a graceful shutdown without waiting for it.
    ///
    /// The producer exits after its current item, and the channels are
    /// stopped according to the plant's [`DrainPolicy`]. Returns true if this
    /// call moved the plant from running to stopping; calling it in any other
    /// state does nothing.
    pub fn stop(&self) -> bool {
        let mut state = self.state.lock();
        let current = *state;
        if current != PlantState::Running {
            debug!(plant_id = self.id, state = %current, "Stop ignored");
            return false;
        }
        info!(plant_id = self.id, "Stopping plant");
        *state = PlantState::Stopping;
        drop(state);

        self.running.cancel(format!("plant {} stopped", self.id));
        true
    }

    /// Blocks until the producer and every worker have exited, then returns
    /// the final tallies.
    ///
    /// Must be preceded by [`stop`](Self::stop): the producer never exits on
    /// its own, so joining a running plant blocks indefinitely. Joining a
    /// plant that was never started returns immediately.
    ///
    /// Returns the first error any thread reported, including panics.
    pub fn join(&self) -> PlantResult<PlantReport> {
        let threads = std::mem::take(&mut *self.threads.lock());

        let mut first_error = None;
        for NamedHandle { name, handle } in threads {
            let outcome = match handle.join() {
                Ok(result) => result,
                Err(payload) => Err(PlantError::thread_panicked(&name, payload.as_ref())),
            };
            if let Err(e) = outcome {
                if e.is_defect() {
                    error!(plant_id = self.id, thread = %name, error = %e, "Plant thread hit a defect");
                } else {
                    warn!(plant_id = self.id, thread = %name, error = %e, "Plant thread failed");
                }
                first_error.get_or_insert(e);
            }
        }

        let stopped = {
            let mut state = self.state.lock();
            if *state == PlantState::Stopping {
                *state = PlantState::Stopped;
            }
            state.is_terminal()
        };

        let report = self.report();
        if stopped {
            info!(
                plant_id = self.id,
                produced = report.produced,
                processed = report.processed,
                waste = report.waste,
                "Plant stopped"
            );
        } else {
            debug!(plant_id = self.id, "Joined a plant that was never started");
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Plant identifier.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The configuration this plant was built with.
    #[must_use]
    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PlantState {
        *self.state.lock()
    }

    /// Oranges accepted into the plant.
    #[must_use]
    pub fn produced(&self) -> u64 {
        self.counters.produced()
    }

    /// Oranges that reached the terminal stage.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.counters.processed()
    }

    /// Whole bottles filled.
    #[must_use]
    pub fn bottles(&self) -> u64 {
        self.report().bottles
    }

    /// Oranges produced but not processed. Only meaningful after joining.
    #[must_use]
    pub fn waste(&self) -> u64 {
        self.report().waste
    }

    /// Snapshot of all counters.
    ///
    /// While the plant runs the counters are read independently, so a
    /// mid-run snapshot may briefly show `processed` ahead of `produced` and
    /// [`PlantReport::is_conserved`] may not hold. The counters are exact once
    /// [`join`](Self::join) returns.
    #[must_use]
    pub fn report(&self) -> PlantReport {
        self.counters.snapshot(self.id, self.config.items_per_bottle)
    }

    /// Number of channels currently holding an orange.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.channels.iter().filter(|channel| !channel.is_empty()).count()
    }
}

impl Drop for Plant {
    fn drop(&mut self) {
        if self.state().has_threads() {
            self.stop();
            if let Err(e) = self.join() {
                warn!(plant_id = self.id, error = %e, "Plant failed while shutting down on drop");
            }
        }
    }
}

impl std::fmt::Debug for Plant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plant")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("produced", &self.produced())
            .field("processed", &self.processed())
            .finish_non_exhaustive()
    }
}
