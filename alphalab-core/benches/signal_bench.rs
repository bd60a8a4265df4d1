//! Criterion benchmarks for the scoring hot paths.
//!
//! Benchmarks:
//! 1. Indicator stack (SMA, RSI, MACD, Bollinger)
//! 2. Full-history Kalman filter vs incremental step
//! 3. Primary score and reconciled report
//! 4. Rolling regime classification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use alphalab_core::domain::{PriceSeries, ReturnSeries};
use alphalab_core::indicators::{Bollinger, Indicator, Macd, Rsi, Sma};
use alphalab_core::kalman::{filter_series, FilterParams, KalmanFilter};
use alphalab_core::regime::{classify_regimes, RegimeParams};
use alphalab_core::signals::{analyze, primary, SignalParams};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_prices(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.05)
        .collect()
}

fn start() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2015, 1, 2).unwrap()
}

// ── 1. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");

    for &len in &[252, 1260, 2520] {
        let prices = make_prices(len);

        group.bench_with_input(BenchmarkId::new("sma_200", len), &prices, |b, p| {
            let sma = Sma::new(200);
            b.iter(|| sma.compute(black_box(p)));
        });

        group.bench_with_input(BenchmarkId::new("full_stack", len), &prices, |b, p| {
            let rsi = Rsi::new(14);
            let macd = Macd::default();
            let bands = Bollinger::default();
            let fast = Sma::new(50);
            let slow = Sma::new(200);
            b.iter(|| {
                black_box(rsi.compute(black_box(p)));
                black_box(macd.compute(black_box(p)));
                black_box(bands.compute(black_box(p)));
                black_box(fast.compute(black_box(p)));
                black_box(slow.compute(black_box(p)));
            });
        });
    }

    group.finish();
}

// ── 2. Filter ────────────────────────────────────────────────────────

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("kalman");
    let prices = make_prices(2520);
    let params = FilterParams::default();

    group.bench_function("filter_series_2520", |b| {
        b.iter(|| filter_series(black_box(&prices), black_box(&params)));
    });

    group.bench_function("incremental_step", |b| {
        let mut filter = KalmanFilter::new(params);
        for p in &prices {
            filter.step(*p);
        }
        b.iter(|| {
            let mut next = filter.clone();
            next.step(black_box(105.0))
        });
    });

    group.finish();
}

// ── 3. Scoring ───────────────────────────────────────────────────────

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    let params = SignalParams::default();

    for &len in &[252, 2520] {
        let prices = make_prices(len);
        group.bench_with_input(BenchmarkId::new("primary", len), &prices, |b, p| {
            b.iter(|| primary::score(black_box(p), "BENCH", &params));
        });

        let series = PriceSeries::from_prices("BENCH", start(), &prices)
            .expect("synthetic prices are valid");
        group.bench_with_input(BenchmarkId::new("analyze", len), &series, |b, s| {
            b.iter(|| analyze(black_box(s), "BENCH", &params, &FilterParams::default()));
        });
    }

    group.finish();
}

// ── 4. Regimes ───────────────────────────────────────────────────────

fn bench_regimes(c: &mut Criterion) {
    let returns: Vec<f64> = (0..2520).map(|i| (i as f64 * 0.37).sin() * 0.01).collect();
    let series = ReturnSeries::from_values("BENCH", start(), returns);
    let params = RegimeParams::default();

    c.bench_function("classify_regimes_2520", |b| {
        b.iter(|| classify_regimes(black_box(&series), &params));
    });
}

criterion_group!(
    benches,
    bench_indicators,
    bench_filter,
    bench_scoring,
    bench_regimes
);
criterion_main!(benches);
