//! Rolling-window regime classification.
//!
//! Annualized rolling mean (× 252) and volatility (sample std × √252) over a
//! trailing window. Return above +threshold is positive, below −threshold
//! negative; volatility above the median of all defined rolling volatilities
//! is high. Warm-up samples are Sideways.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ReturnSeries;
use crate::stats::{self, PERIODS_PER_YEAR};

use super::Regime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeParams {
    pub lookback: usize,
    /// Annualized return band around zero treated as sideways.
    pub return_threshold: f64,
}

impl Default for RegimeParams {
    fn default() -> Self {
        Self {
            lookback: 60,
            return_threshold: 0.02,
        }
    }
}

/// Per-date regime with the statistics that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSeries {
    pub dates: Vec<NaiveDate>,
    pub regimes: Vec<Regime>,
    /// Annualized rolling mean return, NaN during warm-up.
    pub rolling_return: Vec<f64>,
    /// Annualized rolling volatility, NaN during warm-up.
    pub rolling_volatility: Vec<f64>,
    /// Median rolling volatility; `None` when no window completed.
    pub volatility_median: Option<f64>,
}

impl RegimeSeries {
    /// Regime at the latest date.
    pub fn current(&self) -> Option<Regime> {
        self.regimes.last().copied()
    }

    pub fn len(&self) -> usize {
        self.regimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regimes.is_empty()
    }
}

pub fn classify_regimes(returns: &ReturnSeries, params: &RegimeParams) -> RegimeSeries {
    let values = returns.values();
    let lookback = params.lookback.max(2);

    let rolling_return: Vec<f64> = stats::rolling(values, lookback, stats::mean)
        .into_iter()
        .map(|m| m * PERIODS_PER_YEAR)
        .collect();
    let rolling_volatility: Vec<f64> = stats::rolling(values, lookback, stats::std_dev)
        .into_iter()
        .map(|s| s * PERIODS_PER_YEAR.sqrt())
        .collect();

    let volatility_median = stats::median(&rolling_volatility);
    if volatility_median.is_none() && !values.is_empty() {
        tracing::warn!(
            samples = values.len(),
            lookback,
            "history shorter than regime lookback; all samples sideways"
        );
    }

    let regimes = rolling_return
        .iter()
        .zip(&rolling_volatility)
        .map(|(&ret, &vol)| {
            let direction = if ret > params.return_threshold {
                1
            } else if ret < -params.return_threshold {
                -1
            } else {
                0
            };
            // NaN compares false: warm-up samples are low vol and flat
            let high_vol = volatility_median.is_some_and(|m| vol > m);
            Regime::from_parts(direction, high_vol)
        })
        .collect();

    RegimeSeries {
        dates: returns.dates().to_vec(),
        regimes,
        rolling_return,
        rolling_volatility,
        volatility_median,
    }
}

/// Return statistics for the samples spent in one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimePerformance {
    pub regime: Regime,
    pub occurrences: usize,
    pub avg_daily_return: f64,
    pub annualized_volatility: f64,
    pub best_day: f64,
    pub worst_day: f64,
    pub win_rate: f64,
}

/// Performance per regime, in order of first appearance. Non-finite
/// returns are skipped.
pub fn regime_performance(returns: &ReturnSeries, regimes: &RegimeSeries) -> Vec<RegimePerformance> {
    let mut order: Vec<Regime> = Vec::new();
    for r in &regimes.regimes {
        if !order.contains(r) {
            order.push(*r);
        }
    }

    order
        .into_iter()
        .filter_map(|regime| {
            let sample: Vec<f64> = returns
                .values()
                .iter()
                .zip(&regimes.regimes)
                .filter(|(v, r)| **r == regime && v.is_finite())
                .map(|(v, _)| *v)
                .collect();
            if sample.is_empty() {
                return None;
            }
            let wins = sample.iter().filter(|v| **v > 0.0).count();
            Some(RegimePerformance {
                regime,
                occurrences: sample.len(),
                avg_daily_return: stats::mean(&sample),
                annualized_volatility: stats::std_dev(&sample) * PERIODS_PER_YEAR.sqrt(),
                best_day: sample.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                worst_day: sample.iter().copied().fold(f64::INFINITY, f64::min),
                win_rate: wins as f64 / sample.len() as f64,
            })
        })
        .collect()
}
