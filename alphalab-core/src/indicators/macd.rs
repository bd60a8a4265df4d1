//! Moving Average Convergence/Divergence (MACD).
//!
//! line = EMA(fast) - EMA(slow)
//! signal = EMA(signal_span) of line
//! histogram = line - signal
//!
//! All EMAs are seeded at the first finite observation, so values are
//! defined from the first finite price onward.

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;
use super::latest;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdOutput {
    pub fn latest_line(&self) -> Option<f64> {
        latest(&self.line)
    }

    pub fn latest_signal(&self) -> Option<f64> {
        latest(&self.signal)
    }

    pub fn latest_histogram(&self) -> Option<f64> {
        latest(&self.histogram)
    }

    /// Histogram one step before the last. `None` when there is only one
    /// sample or that value is undefined.
    pub fn previous_histogram(&self) -> Option<f64> {
        let n = self.histogram.len();
        if n < 2 {
            return None;
        }
        Some(self.histogram[n - 2]).filter(|v| v.is_finite())
    }
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD spans must be >= 1");
        Self { fast, slow, signal }
    }

    pub fn compute(&self, prices: &[f64]) -> MacdOutput {
        let fast = ema_of_series(prices, self.fast);
        let slow = ema_of_series(prices, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&line, self.signal);
        let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
        MacdOutput {
            line,
            signal,
            histogram,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}
