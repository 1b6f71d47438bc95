//! Multi-plant simulation driver.
//!
//! Builds a fixed number of independent plants, runs them concurrently for
//! a fixed wall-clock window, then stops, joins and sums them.

mod driver;
mod report;

pub use driver::Simulation;
pub use report::{SimulationReport, SimulationTotals};
