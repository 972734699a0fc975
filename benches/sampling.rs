//! Sampling benchmarks for the zone timeline
//!
//! Compares serial and parallel batch sampling at several query counts.
//!
//! Run with: cargo bench --bench sampling

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use bluezone_planner::report::{self, ReportOptions};
use bluezone_planner::zone::{Catalog, Timeline};
use rand::Rng;

/// Random query times spread a little beyond both ends of the timeline
fn random_times(count: usize, total_time: f64) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| rng.gen_range(-60.0..total_time + 60.0))
        .collect()
}

/// Benchmark batch sampling serial vs parallel
fn bench_sample_many(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let map = catalog.find("Erangel").expect("built-in map");
    let timeline = Timeline::for_map(map).expect("valid timeline");

    let mut group = c.benchmark_group("sample_many");
    group.sample_size(50);

    for count in [1_000, 10_000, 100_000, 1_000_000] {
        let times = random_times(count, timeline.total_time());

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("serial", count), &count, |b, _| {
            b.iter(|| black_box(timeline.sample_many_with_threshold(&times, usize::MAX)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, _| {
            b.iter(|| black_box(timeline.sample_many_with_threshold(&times, 0)))
        });
    }
    group.finish();
}

/// Benchmark scalar lookups (binary search per query)
fn bench_sample_scalar(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let map = catalog.find("Karakin").expect("built-in map");
    let timeline = Timeline::for_map(map).expect("valid timeline");

    c.bench_function("sample_scalar", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t = (t + 7.3) % timeline.total_time();
            black_box(timeline.sample(black_box(t)))
        })
    });
}

/// Benchmark a full chart report over the built-in catalog
fn bench_report(c: &mut Criterion) {
    let catalog = Catalog::builtin();

    let mut group = c.benchmark_group("report");
    group.sample_size(20);

    for step in [1.0, 0.05] {
        let options = ReportOptions {
            step,
            ..ReportOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("builtin", step), &options, |b, options| {
            b.iter(|| black_box(report::build(catalog.maps(), options)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sample_many, bench_sample_scalar, bench_report);

criterion_main!(benches);
