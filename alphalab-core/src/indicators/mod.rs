//! Indicator library.
//!
//! Indicators are pure functions: a price sequence in, a numeric series of
//! the same length out. Undefined positions (warm-up, NaN input) are
//! `f64::NAN`; "latest value" accessors surface them as `None`.
//!
//! Multi-series indicators (MACD, Bollinger, support/resistance) return a
//! struct of aligned series instead of implementing the single-series trait.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod pivots;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerOutput};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use pivots::{PivotLevels, SupportResistance};
pub use rsi::Rsi;
pub use sma::Sma;

/// Trait for single-series indicators.
///
/// `compute` returns a `Vec<f64>` of the same length as the input. The first
/// `lookback()` values are `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No value at index t may depend on a price at index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_50", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading samples that are always undefined.
    fn lookback(&self) -> usize;

    fn compute(&self, prices: &[f64]) -> Vec<f64>;

    /// Value at the final index, if defined.
    fn latest(&self, prices: &[f64]) -> Option<f64> {
        latest(&self.compute(prices))
    }
}

/// Last element of a series when it is a finite number.
pub fn latest(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| v.is_finite())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    /// Truncating the input must not change any already-computed value.
    fn assert_no_lookahead(ind: &dyn Indicator, prices: &[f64]) {
        let full = ind.compute(prices);
        for cut in 1..prices.len() {
            let partial = ind.compute(&prices[..cut]);
            for (i, (a, b)) in partial.iter().zip(&full).enumerate() {
                if a.is_nan() {
                    assert!(b.is_nan(), "{} index {i}: NaN vs {b}", ind.name());
                } else {
                    assert_approx(*a, *b, DEFAULT_EPSILON);
                }
            }
        }
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn single_series_indicators_have_no_lookahead() {
        let prices = zigzag(40);
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Sma::new(5)),
            Box::new(Ema::new(5)),
            Box::new(Rsi::new(5)),
        ];
        for ind in &indicators {
            assert_no_lookahead(ind.as_ref(), &prices);
        }
    }

    #[test]
    fn latest_skips_undefined_tail() {
        assert_eq!(latest(&[1.0, f64::NAN]), None);
        assert_eq!(latest(&[f64::NAN, 2.0]), Some(2.0));
        assert_eq!(latest(&[]), None);
    }
}
