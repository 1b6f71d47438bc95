//! Benchmarks for single-slot handoff and short plant runs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use juiceflow::config::PlantConfig;
use juiceflow::core::StageTable;
use juiceflow::mailbox::SingleSlotChannel;
use juiceflow::pipeline::Plant;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn handoff_benchmark(c: &mut Criterion) {
    c.bench_function("handoff_1000", |b| {
        b.iter(|| {
            let channel = Arc::new(SingleSlotChannel::new());
            let producer = {
                let channel = Arc::clone(&channel);
                thread::spawn(move || {
                    for i in 0..1000_u32 {
                        if channel.put(i).is_err() {
                            break;
                        }
                    }
                    channel.signal_stop();
                })
            };
            let mut sum = 0_u64;
            while let Some(i) = channel.get() {
                sum += u64::from(i);
            }
            let _ = producer.join();
            black_box(sum)
        });
    });
}

fn plant_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("plant");
    group.sample_size(10);
    group.bench_function("instant_stages_10ms", |b| {
        b.iter(|| {
            let config = PlantConfig::new().with_stages(StageTable::instant());
            let Ok(plant) = Plant::new(0, config) else {
                return 0;
            };
            if plant.start().is_err() {
                return 0;
            }
            thread::sleep(Duration::from_millis(10));
            plant.stop();
            black_box(plant.join().map(|report| report.processed).unwrap_or(0))
        });
    });
    group.finish();
}

criterion_group!(benches, handoff_benchmark, plant_benchmark);
criterion_main!(benches);
