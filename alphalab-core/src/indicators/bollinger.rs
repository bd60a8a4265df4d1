//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(price, period)
//! - Upper: middle + k * stddev(price, period)
//! - Lower: middle - k * stddev(price, period)
//!
//! Uses sample stddev (divide by N - 1).
//! Lookback: period - 1.

use serde::{Deserialize, Serialize};

use super::latest;

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
}

/// Aligned band series, each the same length as the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerOutput {
    /// Latest (upper, middle, lower), when defined.
    pub fn latest(&self) -> Option<(f64, f64, f64)> {
        Some((latest(&self.upper)?, latest(&self.middle)?, latest(&self.lower)?))
    }
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self { period, multiplier }
    }

    pub fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    pub fn compute(&self, prices: &[f64]) -> BollingerOutput {
        let n = prices.len();
        let mut out = BollingerOutput {
            middle: vec![f64::NAN; n],
            upper: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
        };

        // A single-sample window has no sample deviation.
        if n < self.period || self.period < 2 {
            return out;
        }

        for i in (self.period - 1)..n {
            let window = &prices[(i + 1 - self.period)..=i];
            if window.iter().any(|p| p.is_nan()) {
                continue;
            }

            let mean = window.iter().sum::<f64>() / self.period as f64;
            let variance = window
                .iter()
                .map(|p| {
                    let diff = p - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (self.period - 1) as f64;
            let stddev = variance.sqrt();

            out.middle[i] = mean;
            out.upper[i] = mean + self.multiplier * stddev;
            out.lower[i] = mean - self.multiplier * stddev;
        }

        out
    }
}

impl Default for Bollinger {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}
