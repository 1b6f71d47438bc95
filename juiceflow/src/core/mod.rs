//! Core types for the juiceflow plant.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage: the fixed processing sequence and its cost table
//! - StageItem: one orange moving through a plant
//! - PlantState: plant lifecycle

mod item;
mod stage;
mod status;

pub use item::StageItem;
pub use stage::{Stage, StageTable};
pub use status::PlantState;
