//! Exponential Moving Average (EMA).
//!
//! Recursive, non-adjusted: EMA[t] = EMA[t-1] + alpha * (p[t] - EMA[t-1]),
//! alpha = 2 / (span + 1).
//! Seed: EMA at the first finite observation equals that observation.
//! The increment form keeps a constant input exactly constant.
//! Lookback: 0 (defined from the first finite sample).

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        ema_of_series(prices, self.span)
    }
}

/// EMA of an arbitrary series. Used by MACD for the signal line.
///
/// Leading NaNs stay undefined. An interior NaN is undefined at its own
/// index and leaves the running average unchanged.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        let ema = match prev {
            None => v,
            Some(p) => p + alpha * (v - p),
        };
        result[i] = ema;
        prev = Some(ema);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_span_1_equals_price() {
        let result = Ema::new(1).compute(&[100.0, 200.0, 300.0]);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5, seeded at the first value
        // EMA = 10, 10.5, 11.25, 12.125
        let result = Ema::new(3).compute(&[10.0, 11.0, 12.0, 13.0]);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_leading_nan_seeds_at_first_finite() {
        let result = Ema::new(3).compute(&[f64::NAN, 10.0, 12.0]);
        assert!(result[0].is_nan());
        assert_approx(result[1], 10.0, DEFAULT_EPSILON);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_interior_nan_holds_state() {
        let result = Ema::new(3).compute(&[10.0, f64::NAN, 12.0]);
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let result = Ema::new(26).compute(&[50.0; 40]);
        assert!(result.iter().all(|v| (v - 50.0).abs() < DEFAULT_EPSILON));
    }
}
