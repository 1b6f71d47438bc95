//! Producer and worker loops run on a plant's threads.

use super::counters::PlantCounters;
use crate::cancellation::CancellationToken;
use crate::core::{StageItem, StageTable};
use crate::errors::PlantResult;
use crate::mailbox::{Rejected, SingleSlotChannel};
use std::sync::Arc;
use tracing::{debug, error};

/// Channel type connecting plant stages.
pub(crate) type Mailbox = SingleSlotChannel<StageItem>;

/// Everything one worker thread needs.
pub(crate) struct Worker {
    pub plant_id: usize,
    pub index: usize,
    pub inbound: Arc<Mailbox>,
    /// `None` for the last worker, which only counts finished items.
    pub outbound: Option<Arc<Mailbox>>,
    pub counters: Arc<PlantCounters>,
}

impl Worker {
    /// Runs until the inbound channel is stopped and empty.
    ///
    /// On exit the downstream channel is stopped, which is what lets a
    /// cascading shutdown reach the end of the chain. An invalid transition
    /// ends the worker and also stops its inbound channel so the upstream
    /// worker cannot block forever on a dead stage.
    pub fn run(self) -> PlantResult<()> {
        let result = self.work();
        if result.is_err() {
            self.inbound.signal_stop();
        }
        if let Some(outbound) = &self.outbound {
            outbound.signal_stop();
        }
        result
    }

    fn work(&self) -> PlantResult<()> {
        let mut advanced = 0_u64;
        let mut dropped = 0_u64;

        while let Some(mut item) = self.inbound.get() {
            if item.is_done() {
                self.counters.record_processed();
                debug!(
                    plant_id = self.plant_id,
                    worker = self.index,
                    item_id = item.id(),
                    "Orange fully processed"
                );
                continue;
            }

            debug!(
                plant_id = self.plant_id,
                worker = self.index,
                item_id = item.id(),
                stage = %item.stage(),
                "Processing orange"
            );
            if let Err(e) = item.advance() {
                error!(
                    plant_id = self.plant_id,
                    worker = self.index,
                    error = %e,
                    "Worker hit an invalid transition, stopping"
                );
                return Err(e);
            }
            advanced += 1;

            if let Some(outbound) = &self.outbound {
                if let Err(Rejected(item)) = outbound.put(item) {
                    dropped += 1;
                    debug!(
                        plant_id = self.plant_id,
                        worker = self.index,
                        item_id = item.id(),
                        stage = %item.stage(),
                        "Downstream stopped, orange wasted"
                    );
                }
            }
        }

        debug!(
            plant_id = self.plant_id,
            worker = self.index,
            advanced,
            dropped,
            "Worker drained"
        );
        Ok(())
    }
}

/// The plant's producer: creates oranges until the plant is stopped.
pub(crate) struct Producer {
    pub plant_id: usize,
    pub first: Arc<Mailbox>,
    pub table: Arc<StageTable>,
    pub running: Arc<CancellationToken>,
    pub counters: Arc<PlantCounters>,
}

impl Producer {
    /// Produces until the token is cancelled or the first channel refuses
    /// an item.
    pub fn run(self) -> PlantResult<()> {
        let mut next_id = 0_u64;

        while !self.running.is_cancelled() {
            let item = StageItem::new(next_id, Arc::clone(&self.table));
            next_id += 1;

            match self.first.put(item) {
                Ok(()) => {
                    self.counters.record_produced();
                    debug!(plant_id = self.plant_id, item_id = next_id - 1, "Provided a new orange");
                }
                Err(Rejected(item)) => {
                    debug!(
                        plant_id = self.plant_id,
                        item_id = item.id(),
                        "Plant stopped, new orange discarded"
                    );
                    break;
                }
            }
        }

        debug!(plant_id = self.plant_id, produced = self.counters.produced(), "Producer finished");
        Ok(())
    }
}
