//! A single orange moving through the plant.

use super::stage::{Stage, StageTable};
use crate::errors::PlantResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// One unit of work flowing through a plant.
///
/// An item is owned by exactly one thread at a time; ownership moves through
/// the channels between workers, so no locking is needed here.
#[derive(Debug)]
pub struct StageItem {
    id: u64,
    stage: Stage,
    table: Arc<StageTable>,
}

impl StageItem {
    /// Creates an item in the initial stage and performs that stage's work.
    ///
    /// This blocks for the initial stage's cost.
    #[must_use]
    pub fn new(id: u64, table: Arc<StageTable>) -> Self {
        let item = Self {
            id,
            stage: Stage::INITIAL,
            table,
        };
        item.work();
        item
    }

    /// Sequence number assigned by the producer.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Cost of the current stage.
    #[must_use]
    pub fn cost(&self) -> Duration {
        self.table.cost(self.stage)
    }

    /// Returns true once the item has been fully processed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Performs the current stage's work, then moves to the next stage.
    ///
    /// Fails without delay if the item is already at the terminal stage.
    pub fn advance(&mut self) -> PlantResult<Stage> {
        let next = self.stage.next(self.id)?;
        self.work();
        trace!(item_id = self.id, from = %self.stage, to = %next, "Item advanced");
        self.stage = next;
        Ok(next)
    }

    fn work(&self) {
        let cost = self.cost();
        if !cost.is_zero() {
            std::thread::sleep(cost);
        }
    }
}
