//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` prices. A window holding any NaN is
//! undefined, so leading voids delay the first value.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        let period = self.period;
        let mut out = Vec::with_capacity(prices.len());
        let mut finite_sum = 0.0;
        let mut voids = 0usize;

        for (i, &p) in prices.iter().enumerate() {
            if p.is_nan() {
                voids += 1;
            } else {
                finite_sum += p;
            }
            if i >= period {
                let gone = prices[i - period];
                if gone.is_nan() {
                    voids -= 1;
                } else {
                    finite_sum -= gone;
                }
            }

            let full = i + 1 >= period;
            out.push(if full && voids == 0 {
                finite_sum / period as f64
            } else {
                f64::NAN
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn three_period_average() {
        let out = Sma::new(3).compute(&[2.0, 4.0, 6.0, 8.0, 13.0]);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_approx(out[2], 4.0, DEFAULT_EPSILON);
        assert_approx(out[3], 6.0, DEFAULT_EPSILON);
        assert_approx(out[4], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn period_one_echoes_input() {
        let prices = [101.5, 99.0, 100.25];
        let out = Sma::new(1).compute(&prices);
        for (got, want) in out.iter().zip(prices) {
            assert_approx(*got, want, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn void_blanks_every_window_it_touches() {
        let out = Sma::new(2).compute(&[1.0, f64::NAN, 3.0, 5.0, 7.0]);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_approx(out[3], 4.0, DEFAULT_EPSILON);
        assert_approx(out[4], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn leading_voids_delay_first_value() {
        let out = Sma::new(2).compute(&[f64::NAN, f64::NAN, 10.0, 12.0]);
        assert_eq!(out.iter().filter(|v| v.is_nan()).count(), 3);
        assert_approx(out[3], 11.0, DEFAULT_EPSILON);
    }

    #[test]
    fn short_input_is_all_undefined() {
        let out = Sma::new(50).compute(&[1.0; 49]);
        assert_eq!(out.len(), 49);
        assert!(out.iter().all(|v| v.is_nan()));
        assert_eq!(Sma::new(50).lookback(), 49);
    }
}
