//! Signal construction and windowed regression benchmarks.
//!
//! Run with: `cargo bench --package flowbeta-bench`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use flowbeta_bench::{synthetic_quotes, synthetic_signals, synthetic_trades};
use flowbeta_lib::{
    CovarianceType, DateRange, DepthParams, MemoryTickSource, RegressionParams, SignalParams,
    WindowedRegression, assemble_signals, depth_series, resample,
};
use std::hint::black_box;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 11, d).unwrap()
}

fn resample_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");

    for count in [10_000_usize, 100_000, 1_000_000] {
        let quotes = synthetic_quotes(day(15), count, 1);
        let trades = synthetic_trades(day(15), count / 4, 2);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("signals", count), &count, |b, _| {
            b.iter(|| resample(black_box(&quotes), black_box(&trades), &SignalParams::default()));
        });
        group.bench_with_input(BenchmarkId::new("depth", count), &count, |b, _| {
            b.iter(|| depth_series(black_box(&quotes), &DepthParams::default()));
        });
    }

    group.finish();
}

fn assemble_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    group.sample_size(10);

    let mut source = MemoryTickSource::new();
    for (i, d) in (15..22).enumerate() {
        let seed = i as u64 + 1;
        source.insert(
            day(d),
            synthetic_quotes(day(d), 200_000, seed),
            synthetic_trades(day(d), 50_000, seed + 100),
        );
    }
    let range = DateRange::new(day(15), day(21)).unwrap();
    group.throughput(Throughput::Elements(7));

    group.bench_function("7-days", |b| {
        b.iter(|| assemble_signals(black_box(&source), range, SignalParams::default()));
    });

    group.finish();
}

fn regression_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed_regression");
    let rows = synthetic_signals(day(15), 7, 42);
    group.throughput(Throughput::Elements(rows.len() as u64));

    let estimators = [
        ("nonrobust", CovarianceType::NonRobust),
        ("hc0", CovarianceType::Hc0),
        ("hac4", CovarianceType::Hac { maxlags: 4 }),
        ("hac20", CovarianceType::Hac { maxlags: 20 }),
    ];

    for (name, covariance) in estimators {
        let engine = WindowedRegression::new(RegressionParams {
            covariance,
            ..Default::default()
        });
        group.bench_with_input(BenchmarkId::new("ofi", name), &engine, |b, engine| {
            b.iter(|| engine.fit(black_box(&rows)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    resample_benchmark,
    assemble_benchmark,
    regression_benchmark
);
criterion_main!(benches);
