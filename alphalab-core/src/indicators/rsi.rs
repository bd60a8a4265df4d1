//! Relative Strength Index (RSI).
//!
//! Average gain and average loss are simple rolling means of the last
//! `period` price changes (no Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 with gains → 100; no movement at all → undefined.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        let n = prices.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        // changes[i] is the move into index i; changes[0] is undefined
        let changes: Vec<f64> = std::iter::once(f64::NAN)
            .chain(prices.windows(2).map(|w| w[1] - w[0]))
            .collect();

        for i in self.period..n {
            let window = &changes[(i + 1 - self.period)..=i];
            if window.iter().any(|c| c.is_nan()) {
                continue;
            }
            let gain: f64 = window.iter().filter(|&&c| c > 0.0).sum();
            let loss: f64 = window.iter().filter(|&&c| c < 0.0).map(|c| -c).sum();
            let avg_gain = gain / self.period as f64;
            let avg_loss = loss / self.period as f64;
            result[i] = compute_rsi(avg_gain, avg_loss);
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
