//! Look-ahead contamination tests for indicators and the filter.
//!
//! Invariant: no value at index t may depend on prices at t+1 or later.
//!
//! Method: compute on a truncated series (0..100) and the full series
//! (0..200). Indices 0..100 must be identical between both runs.

use alphalab_core::indicators::{Bollinger, Ema, Indicator, Macd, Rsi, Sma};
use alphalab_core::kalman::{filter_series, FilterParams};

/// Deterministic pseudo-random walk using a simple LCG.
fn make_test_prices(n: usize) -> Vec<f64> {
    let mut price = 100.0;
    (0..n)
        .map(|i| {
            let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
            let change = ((seed % 200) as f64 - 100.0) * 0.05;
            price = (price + change).max(10.0);
            price
        })
        .collect()
}

fn assert_prefix_equal(name: &str, truncated: &[f64], full: &[f64]) {
    for (i, (t, f)) in truncated.iter().zip(full).enumerate() {
        if t.is_nan() && f.is_nan() {
            continue;
        }
        assert!(
            !t.is_nan() && !f.is_nan(),
            "{name}: NaN mismatch at {i} (truncated={t}, full={f})"
        );
        assert!(
            (t - f).abs() < 1e-10,
            "{name}: look-ahead contamination at {i}: truncated={t}, full={f}"
        );
    }
}

fn assert_no_lookahead(indicator: &dyn Indicator, prices: &[f64], truncated_len: usize) {
    let full = indicator.compute(prices);
    let truncated = indicator.compute(&prices[..truncated_len]);
    assert_eq!(truncated.len(), truncated_len, "{}: length", indicator.name());
    assert_eq!(full.len(), prices.len(), "{}: length", indicator.name());
    assert_prefix_equal(indicator.name(), &truncated, &full);
}

#[test]
fn lookahead_sma() {
    let prices = make_test_prices(200);
    assert_no_lookahead(&Sma::new(10), &prices, 100);
    assert_no_lookahead(&Sma::new(50), &prices, 100);
}

#[test]
fn lookahead_ema() {
    let prices = make_test_prices(200);
    assert_no_lookahead(&Ema::new(12), &prices, 100);
    assert_no_lookahead(&Ema::new(26), &prices, 100);
}

#[test]
fn lookahead_rsi() {
    let prices = make_test_prices(200);
    assert_no_lookahead(&Rsi::new(14), &prices, 100);
    assert_no_lookahead(&Rsi::new(7), &prices, 100);
}

#[test]
fn lookahead_macd() {
    let prices = make_test_prices(200);
    let macd = Macd::default();
    let full = macd.compute(&prices);
    let truncated = macd.compute(&prices[..100]);
    assert_prefix_equal("macd line", &truncated.line, &full.line);
    assert_prefix_equal("macd signal", &truncated.signal, &full.signal);
    assert_prefix_equal("macd histogram", &truncated.histogram, &full.histogram);
}

#[test]
fn lookahead_bollinger() {
    let prices = make_test_prices(200);
    let bands = Bollinger::default();
    let full = bands.compute(&prices);
    let truncated = bands.compute(&prices[..100]);
    assert_prefix_equal("bollinger upper", &truncated.upper, &full.upper);
    assert_prefix_equal("bollinger middle", &truncated.middle, &full.middle);
    assert_prefix_equal("bollinger lower", &truncated.lower, &full.lower);
}

#[test]
fn lookahead_kalman() {
    let prices = make_test_prices(200);
    let params = FilterParams::default();
    let full = filter_series(&prices, &params).unwrap();
    let truncated = filter_series(&prices[..100], &params).unwrap();
    assert_prefix_equal("kalman smoothed", &truncated.smoothed, &full.smoothed);
    assert_prefix_equal("kalman variance", &truncated.variances, &full.variances);
}
