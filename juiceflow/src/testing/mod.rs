//! Testing utilities for juiceflow plants.
//!
//! This module provides:
//! - Compressed-timing fixtures
//! - Assertions over plant and simulation reports

mod assertions;
mod fixtures;

pub use assertions::{assert_conserved, assert_totals_match, assert_waste_bounded, MAX_IN_FLIGHT};
pub use fixtures::{quick_simulation, run_plant_for, uniform_plant};
