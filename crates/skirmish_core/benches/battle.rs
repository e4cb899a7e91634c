//! Battle resolution benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use skirmish_core::battle::{resolve, BattleConfig};
use skirmish_core::data::{RosterConfig, UnitTemplates};
use skirmish_core::draw::RandomDraws;
use skirmish_core::roster::build;
use skirmish_core::trial::{run_batch, run_trial, BatchSpec};
use skirmish_core::units::{Side, UnitType};

fn army(size: i64) -> RosterConfig {
    RosterConfig::new()
        .with_units(Side::One, UnitType::Footman, size)
        .with_units(Side::One, UnitType::Archer, size)
        .with_units(Side::Two, UnitType::Footman, size)
        .with_units(Side::Two, UnitType::Archer, size)
}

/// Roster construction alone.
pub fn build_benchmark(c: &mut Criterion) {
    let templates = UnitTemplates::default();
    let mut group = c.benchmark_group("build");
    for size in [1, 10, 100] {
        let roster = army(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &roster, |b, roster| {
            b.iter(|| black_box(build(roster, &templates)));
        });
    }
    group.finish();
}

/// One full trial: build plus resolve.
pub fn trial_benchmark(c: &mut Criterion) {
    let templates = UnitTemplates::default();
    let config = BattleConfig::default();
    let mut group = c.benchmark_group("trial");
    for size in [1, 10, 100] {
        let roster = army(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &roster, |b, roster| {
            let mut draws = RandomDraws::seeded(42);
            b.iter(|| black_box(run_trial(roster, &templates, &config, &mut draws)));
        });
    }
    group.finish();
}

/// Resolution of a pre-built battlefield, excluding construction.
pub fn resolve_benchmark(c: &mut Criterion) {
    let field = build(&army(50), &UnitTemplates::default()).battlefield;
    c.bench_function("resolve_50v50", |b| {
        let mut draws = RandomDraws::seeded(7);
        b.iter_batched(
            || field.clone(),
            |mut field| black_box(resolve(&mut field, &mut draws)),
            criterion::BatchSize::SmallInput,
        );
    });
}

/// The classic 1v1 batch.
pub fn batch_benchmark(c: &mut Criterion) {
    let spec = BatchSpec::new(RosterConfig::classic(), 1_000);
    c.bench_function("classic_batch_1000", |b| {
        b.iter(|| black_box(run_batch(&spec, |_| {})));
    });
}

criterion_group!(
    benches,
    build_benchmark,
    trial_benchmark,
    resolve_benchmark,
    batch_benchmark
);
criterion_main!(benches);
