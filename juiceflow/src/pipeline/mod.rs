//! Plant orchestration.
//!
//! This module provides:
//! - The plant: channel chain, worker and producer threads, lifecycle
//! - Production counters and per-plant reports
//! - The worker and producer loops

mod counters;
mod integration_tests;
mod plant;
mod worker;

pub use counters::{PlantCounters, PlantReport};
pub use plant::Plant;
