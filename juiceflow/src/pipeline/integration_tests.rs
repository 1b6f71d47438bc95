//! End-to-end plant tests with compressed timings.

#[cfg(test)]
mod tests {
    use crate::config::{DrainPolicy, PlantConfig};
    use crate::core::{PlantState, Stage, StageTable};
    use crate::pipeline::Plant;
    use crate::testing::{assert_conserved, assert_waste_bounded, run_plant_for};
    use std::thread;
    use std::time::{Duration, Instant};

    fn uniform(millis: u64, drain: DrainPolicy) -> PlantConfig {
        PlantConfig::new()
            .with_stages(StageTable::uniform(millis))
            .with_drain(drain)
    }

    #[test]
    fn test_single_plant_short_run() {
        let report = run_plant_for(1, uniform(1, DrainPolicy::Discard), Duration::from_millis(50));

        // Creation alone costs 1ms per orange, so throughput tracks elapsed
        // time over the cheapest stage.
        assert!(report.produced >= 15, "throughput too low: {report:?}");
        assert!(report.produced <= 100, "produced too many: {report:?}");
        assert!(report.processed <= report.produced);
        assert_conserved(&report);
        assert_waste_bounded(&report);
    }

    #[test]
    fn test_bottles_follow_processed() {
        let config = uniform(0, DrainPolicy::Discard).with_items_per_bottle(4);
        let report = run_plant_for(2, config, Duration::from_millis(30));

        assert!(report.processed > 0);
        assert_eq!(report.bottles, report.processed / 4);
    }

    #[test]
    fn test_cascade_drain_wastes_nothing() {
        let report = run_plant_for(1, uniform(1, DrainPolicy::Cascade), Duration::from_millis(50));

        assert!(report.produced >= 1);
        assert_eq!(report.waste, 0, "cascade drain lost oranges: {report:?}");
        assert_eq!(report.produced, report.processed);
    }

    #[test]
    fn test_cascade_with_instant_stages_is_lossless() {
        for plant_id in 0..5 {
            let report =
                run_plant_for(plant_id, uniform(0, DrainPolicy::Cascade), Duration::from_millis(5));
            assert_eq!(report.waste, 0, "run {plant_id}: {report:?}");
        }
    }

    #[test]
    fn test_stop_then_join_terminates_promptly() {
        let config = PlantConfig::new().with_stages(StageTable::uniform(20));
        let plant = Plant::new(1, config).unwrap();
        plant.start().unwrap();
        thread::sleep(Duration::from_millis(60));

        let stopped_at = Instant::now();
        plant.stop();
        let report = plant.join().unwrap();

        // At most one stage of in-hand work per worker, plus one creation.
        assert!(
            stopped_at.elapsed() < Duration::from_millis(20 * 2 + 500),
            "join took {:?}",
            stopped_at.elapsed()
        );
        assert_eq!(plant.state(), PlantState::Stopped);
        assert_conserved(&report);
    }

    #[test]
    fn test_slow_stage_bounds_in_flight_work() {
        let stages = StageTable::instant().with_cost(Stage::Squeezed, 10);
        let plant = Plant::new(1, PlantConfig::new().with_stages(stages)).unwrap();
        plant.start().unwrap();
        thread::sleep(Duration::from_millis(100));

        // Upstream of the bottleneck every boundary is full, yet no boundary
        // ever holds more than one orange.
        assert!(plant.buffered() <= Stage::COUNT);
        assert!(plant.report().waste <= 2 * Stage::COUNT as u64);

        plant.stop();
        let report = plant.join().unwrap();
        assert_waste_bounded(&report);
    }

    #[test]
    fn test_independent_plants() {
        let fast = Plant::new(1, uniform(1, DrainPolicy::Discard)).unwrap();
        let slow = Plant::new(2, uniform(3, DrainPolicy::Discard)).unwrap();
        fast.start().unwrap();
        slow.start().unwrap();
        thread::sleep(Duration::from_millis(40));

        fast.stop();
        let fast_report = fast.join().unwrap();
        let slow_before = slow.produced();

        // Stopping one plant must not affect the other.
        thread::sleep(Duration::from_millis(40));
        assert_eq!(slow.state(), PlantState::Running);
        assert!(slow.produced() > slow_before);
        assert_eq!(fast.report(), fast_report);

        slow.stop();
        let slow_report = slow.join().unwrap();

        assert_eq!(fast_report.plant_id, 1);
        assert_eq!(slow_report.plant_id, 2);
        assert_conserved(&fast_report);
        assert_conserved(&slow_report);
    }

    #[test]
    fn test_plants_across_threads() {
        let plants: Vec<_> = (0..4)
            .map(|id| std::sync::Arc::new(Plant::new(id, uniform(1, DrainPolicy::Discard)).unwrap()))
            .collect();
        for plant in &plants {
            plant.start().unwrap();
        }
        thread::sleep(Duration::from_millis(30));

        let joiners: Vec<_> = plants
            .iter()
            .cloned()
            .map(|plant| {
                thread::spawn(move || {
                    plant.stop();
                    plant.join()
                })
            })
            .collect();

        for joiner in joiners {
            let report = joiner.join().unwrap().unwrap();
            assert_conserved(&report);
            assert_waste_bounded(&report);
        }
    }
}
