//! Floor-trader pivot support/resistance.
//!
//! H/L are the 3-period rolling max/min of prices, C is the current price.
//! pivot = (H + L + C) / 3
//! R1 = 2P - L, S1 = 2P - H, R2 = P + (H - L), S2 = P - (H - L)
//! plus the rolling `window` high/low.

use serde::{Deserialize, Serialize};

use crate::stats::rolling;

const PIVOT_WINDOW: usize = 3;

#[derive(Debug, Clone)]
pub struct SupportResistance {
    window: usize,
}

/// Latest pivot levels. Each is `None` until enough history exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub pivot: Option<f64>,
    pub resistance_1: Option<f64>,
    pub resistance_2: Option<f64>,
    pub support_1: Option<f64>,
    pub support_2: Option<f64>,
    pub recent_high: Option<f64>,
    pub recent_low: Option<f64>,
}

fn window_max(w: &[f64]) -> f64 {
    w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn window_min(w: &[f64]) -> f64 {
    w.iter().copied().fold(f64::INFINITY, f64::min)
}

fn defined(v: f64) -> Option<f64> {
    Some(v).filter(|v| v.is_finite())
}

impl SupportResistance {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "support/resistance window must be >= 1");
        Self { window }
    }

    pub fn latest(&self, prices: &[f64]) -> PivotLevels {
        let n = prices.len();
        let (high, low, close) = if n >= PIVOT_WINDOW {
            let tail = &prices[n - PIVOT_WINDOW..];
            if tail.iter().any(|p| p.is_nan()) {
                (f64::NAN, f64::NAN, f64::NAN)
            } else {
                (window_max(tail), window_min(tail), prices[n - 1])
            }
        } else {
            (f64::NAN, f64::NAN, f64::NAN)
        };

        let pivot = (high + low + close) / 3.0;
        let range = high - low;

        let recent_high = rolling(prices, self.window, window_max);
        let recent_low = rolling(prices, self.window, window_min);

        PivotLevels {
            pivot: defined(pivot),
            resistance_1: defined(2.0 * pivot - low),
            resistance_2: defined(pivot + range),
            support_1: defined(2.0 * pivot - high),
            support_2: defined(pivot - range),
            recent_high: recent_high.last().copied().and_then(defined),
            recent_low: recent_low.last().copied().and_then(defined),
        }
    }
}

impl Default for SupportResistance {
    fn default() -> Self {
        Self::new(20)
    }
}
