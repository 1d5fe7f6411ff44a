#![allow(clippy::expect_used, missing_docs)]

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use projection_service::domain::market_data::HistoricalSeries;
use projection_service::domain::projection::{
    PricePathSimulator, SimulationLimits, SimulationParams,
};
use std::hint::black_box;

// Guideline: 1000 paths x (252 history + 252 horizon) well under 100 ms.

fn one_year_history() -> HistoricalSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid date");
    let dates: Vec<NaiveDate> = (0..252_u64).map(|i| start + Days::new(i)).collect();
    let closes: Vec<f64> = (0..252_u32)
        .map(|i| 100.0 + 5.0 * (f64::from(i) / 10.0).sin())
        .collect();
    HistoricalSeries::from_parts(&dates, &closes).expect("valid series")
}

fn simulator(paths: usize, horizon_years: u32) -> PricePathSimulator {
    let params = SimulationParams::builder()
        .paths(paths)
        .horizon_years(horizon_years)
        .seed(42)
        .build();
    PricePathSimulator::new(params, SimulationLimits::default()).expect("valid params")
}

fn bench_simulate_paths(c: &mut Criterion) {
    let series = one_year_history();
    let mut group = c.benchmark_group("simulate_paths");

    for paths in [100, 1000, 10_000] {
        let sim = simulator(paths, 1);
        group.bench_with_input(BenchmarkId::from_parameter(paths), &paths, |b, _| {
            b.iter(|| black_box(sim.simulate(black_box(&series)).expect("simulation succeeds")))
        });
    }

    group.finish();
}

fn bench_horizon(c: &mut Criterion) {
    let series = one_year_history();
    let mut group = c.benchmark_group("simulate_horizon");

    for years in [1, 5, 10] {
        let sim = simulator(1000, years);
        group.bench_with_input(BenchmarkId::from_parameter(years), &years, |b, _| {
            b.iter(|| black_box(sim.simulate(black_box(&series)).expect("simulation succeeds")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulate_paths, bench_horizon);
criterion_main!(benches);
