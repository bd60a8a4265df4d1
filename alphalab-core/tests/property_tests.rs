//! Property tests for scoring and indicator invariants.
//!
//! Uses proptest to verify:
//! 1. Score bounds: primary score in [−6, 6], confidence in [0, 100]
//! 2. Undefined warm-up: windows longer than the input give all-NaN output
//! 3. Rising series: trend +3 and a buy action
//! 4. Constant series: momentum −1, extremes 0
//! 5. Incremental filter matches the batch filter

use alphalab_core::indicators::{Bollinger, Indicator, Rsi, Sma};
use alphalab_core::kalman::{filter_series, FilterParams, KalmanFilter};
use alphalab_core::regime::{classify_regimes, RegimeParams};
use alphalab_core::signals::primary;
use alphalab_core::signals::SignalParams;
use alphalab_core::domain::ReturnSeries;
use chrono::NaiveDate;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, 1..max_len)
}

/// Random walk of multiplicative steps within ±5%.
fn arb_walk(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.05..0.05_f64, 1..max_len).prop_map(|steps| {
        let mut price = 100.0;
        steps
            .into_iter()
            .map(|s| {
                price *= 1.0 + s;
                price
            })
            .collect()
    })
}

// ── 1. Score bounds ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn score_and_confidence_are_bounded(prices in arb_walk(400)) {
        let r = primary::score(&prices, "TEST", &SignalParams::default());
        prop_assert!((-6.0..=6.0).contains(&r.score));
        prop_assert!((0.0..=100.0).contains(&r.confidence));
    }

    #[test]
    fn noisy_prices_stay_bounded(prices in arb_prices(300)) {
        let r = primary::score(&prices, "TEST", &SignalParams::default());
        prop_assert!((-6.0..=6.0).contains(&r.score));
        prop_assert!((0.0..=100.0).contains(&r.confidence));
    }
}

// ── 2. Undefined warm-up ─────────────────────────────────────────────

proptest! {
    #[test]
    fn short_input_is_undefined_everywhere(
        period in 2usize..60,
        prices in arb_prices(60),
    ) {
        prop_assume!(prices.len() < period);
        prop_assert!(Sma::new(period).compute(&prices).iter().all(|v| v.is_nan()));
        prop_assert!(Rsi::new(period).compute(&prices).iter().all(|v| v.is_nan()));
        let bands = Bollinger::new(period, 2.0).compute(&prices);
        prop_assert!(bands.upper.iter().all(|v| v.is_nan()));
    }
}

// ── 3. Rising series ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn geometric_rise_is_bullish(
        growth in 0.002..0.02_f64,
        len in 250usize..400,
    ) {
        let prices: Vec<f64> = (0..len).map(|i| 50.0 * (1.0 + growth).powi(i as i32)).collect();
        let r = primary::score(&prices, "TEST", &SignalParams::default());
        prop_assert_eq!(r.trend(), 3.0);
        prop_assert!(r.action.is_buy(), "action {:?} score {}", r.action, r.score);
    }
}

// ── 4. Constant series ───────────────────────────────────────────────

proptest! {
    #[test]
    fn constant_series_resolves_momentum_down(
        level in 1.0..500.0_f64,
        len in 1usize..300,
    ) {
        let prices = vec![level; len];
        let r = primary::score(&prices, "TEST", &SignalParams::default());
        prop_assert_eq!(r.momentum(), -1.0);
        prop_assert_eq!(r.extremes(), 0.0);
    }
}

// ── 5. Incremental filter ────────────────────────────────────────────

proptest! {
    #[test]
    fn incremental_filter_matches_batch(prices in arb_walk(200)) {
        prop_assume!(prices.len() >= 2);
        let params = FilterParams::default();
        let batch = filter_series(&prices, &params).unwrap();

        let mut filter = KalmanFilter::new(params);
        for (i, p) in prices.iter().enumerate() {
            let (mean, var) = filter.step(*p);
            prop_assert!((mean - batch.smoothed[i]).abs() < 1e-9);
            prop_assert!((var - batch.variances[i]).abs() < 1e-12);
        }
        let state = filter.state().unwrap();
        prop_assert!((state.one_step_forecast - batch.state.one_step_forecast).abs() < 1e-9);
    }

    #[test]
    fn regime_series_covers_every_date(returns in prop::collection::vec(-0.05..0.05_f64, 0..200)) {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let n = returns.len();
        let series = ReturnSeries::from_values("TEST", start, returns);
        let regimes = classify_regimes(&series, &RegimeParams::default());
        prop_assert_eq!(regimes.len(), n);
        prop_assert_eq!(regimes.rolling_volatility.len(), n);
    }
}
