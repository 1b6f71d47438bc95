//! Test assertions for plant reports.

use crate::core::Stage;
use crate::pipeline::PlantReport;
use crate::simulation::SimulationReport;

/// Largest number of accepted oranges a plant can hold at once: one per
/// channel, plus one in the hands of every worker that advances items.
pub const MAX_IN_FLIGHT: u64 = (2 * Stage::COUNT - 1) as u64;

/// Asserts that `produced == processed + waste`.
pub fn assert_conserved(report: &PlantReport) {
    assert!(
        report.is_conserved(),
        "Counters not conserved for plant {}: produced {} != processed {} + waste {}",
        report.plant_id,
        report.produced,
        report.processed,
        report.waste
    );
}

/// Asserts that waste does not exceed what could have been in flight.
pub fn assert_waste_bounded(report: &PlantReport) {
    assert!(
        report.waste <= MAX_IN_FLIGHT,
        "Plant {} wasted {} oranges, more than the {} that fit in flight",
        report.plant_id,
        report.waste,
        MAX_IN_FLIGHT
    );
}

/// Asserts that simulation totals are the sum of the per-plant reports.
pub fn assert_totals_match(report: &SimulationReport) {
    let produced: u64 = report.plants.iter().map(|p| p.produced).sum();
    let processed: u64 = report.plants.iter().map(|p| p.processed).sum();
    let bottles: u64 = report.plants.iter().map(|p| p.bottles).sum();
    let waste: u64 = report.plants.iter().map(|p| p.waste).sum();

    assert_eq!(report.totals.produced, produced, "produced totals differ");
    assert_eq!(report.totals.processed, processed, "processed totals differ");
    assert_eq!(report.totals.bottles, bottles, "bottle totals differ");
    assert_eq!(report.totals.waste, waste, "waste totals differ");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_conserved_passes() {
        assert_conserved(&PlantReport::new(1, 10, 8, 3));
    }

    #[test]
    #[should_panic(expected = "not conserved")]
    fn test_assert_conserved_fails() {
        let mut report = PlantReport::new(1, 10, 8, 3);
        report.waste = 5;
        assert_conserved(&report);
    }

    #[test]
    #[should_panic(expected = "more than")]
    fn test_assert_waste_bounded_fails() {
        assert_waste_bounded(&PlantReport::new(1, 100, 10, 3));
    }
}
