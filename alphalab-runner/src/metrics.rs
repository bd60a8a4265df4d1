//! Performance metrics: pure functions over a periodic return series.
//!
//! Every metric is a pure function: returns in, scalar out. Degenerate
//! denominators give 0 rather than NaN or infinity.

use serde::{Deserialize, Serialize};

use alphalab_core::data::align_pair;
use alphalab_core::domain::ReturnSeries;
use alphalab_core::stats::{self, PERIODS_PER_YEAR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsParams {
    /// Annual risk-free rate as a fraction.
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
            periods_per_year: PERIODS_PER_YEAR,
        }
    }
}

/// Backward-looking risk/return metrics for one return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub total_return: f64,
    pub annual_return: f64,
    pub annual_volatility: f64,
    pub sharpe: f64,
    pub sortino: f64,
    /// Negative fraction, e.g. −0.15 for a 15% drawdown.
    pub max_drawdown: f64,
    pub calmar: f64,
    pub win_rate: f64,
    /// Annualized sample std of negative returns.
    pub downside_deviation: f64,
    /// Present only when a benchmark overlaps the series.
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    /// Finite returns used.
    pub periods: usize,
    pub warnings: Vec<String>,
}

impl MetricsBundle {
    fn zero(warnings: Vec<String>) -> Self {
        Self {
            total_return: 0.0,
            annual_return: 0.0,
            annual_volatility: 0.0,
            sharpe: 0.0,
            sortino: 0.0,
            max_drawdown: 0.0,
            calmar: 0.0,
            win_rate: 0.0,
            downside_deviation: 0.0,
            alpha: None,
            beta: None,
            periods: 0,
            warnings,
        }
    }

    /// Compute all metrics, plus alpha/beta against `benchmark` when given.
    ///
    /// Non-finite returns are dropped first.
    pub fn compute(
        returns: &ReturnSeries,
        benchmark: Option<&ReturnSeries>,
        params: &MetricsParams,
    ) -> Self {
        let clean = returns.finite();
        let values = clean.values();
        let n = values.len();
        let mut warnings = Vec::new();

        if n == 0 {
            tracing::warn!(symbol = returns.symbol(), "no returns to compute metrics from");
            warnings.push("No data available to calculate metrics".to_string());
            return Self::zero(warnings);
        }
        if n < 2 {
            tracing::warn!(symbol = returns.symbol(), periods = n, "metrics may be unreliable");
            warnings.push(format!(
                "Only {n} period(s) of data; metrics may be unreliable"
            ));
        }

        let ppy = params.periods_per_year;
        let rf = params.risk_free_rate;

        let total = total_return(values);
        let annual = annual_return(total, n, ppy);
        let vol = annual_volatility(values, ppy);
        let downside = downside_deviation(values, ppy);
        let mdd = max_drawdown(values);

        let (alpha, beta) = match benchmark {
            Some(bench) => match alpha_beta(returns, bench, annual, params) {
                Some((a, b)) => (Some(a), Some(b)),
                None => {
                    tracing::warn!(
                        symbol = returns.symbol(),
                        benchmark = bench.symbol(),
                        "benchmark has no overlapping dates"
                    );
                    warnings.push(format!(
                        "Benchmark {} has no dates in common; alpha and beta omitted",
                        bench.symbol()
                    ));
                    (None, None)
                }
            },
            None => (None, None),
        };

        Self {
            total_return: total,
            annual_return: annual,
            annual_volatility: vol,
            sharpe: stats::safe_ratio(annual - rf, vol),
            sortino: stats::safe_ratio(annual - rf, downside),
            max_drawdown: mdd,
            calmar: stats::safe_ratio(annual, mdd.abs()),
            win_rate: win_rate(values),
            downside_deviation: downside,
            alpha,
            beta,
            periods: n,
            warnings,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// `Π(1 + r) − 1`.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// `(1 + total)^(ppy / n) − 1`; 0 for an empty series.
pub fn annual_return(total: f64, n: usize, periods_per_year: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let annual = (1.0 + total).powf(periods_per_year / n as f64) - 1.0;
    if annual.is_finite() {
        annual
    } else {
        0.0
    }
}

/// Sample std × √ppy. 0 for fewer than two returns.
pub fn annual_volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    stats::std_dev(returns) * periods_per_year.sqrt()
}

/// Sample std of the negative returns × √ppy.
pub fn downside_deviation(returns: &[f64], periods_per_year: f64) -> f64 {
    let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    stats::std_dev(&negative) * periods_per_year.sqrt()
}

/// Compounded wealth index starting from 1.0 before the first return.
pub fn cumulative_wealth(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |wealth, r| {
            *wealth *= 1.0 + r;
            Some(*wealth)
        })
        .collect()
}

/// Drawdown from the running peak of the wealth index, ≤ 0 everywhere.
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    cumulative_wealth(returns)
        .into_iter()
        .map(|w| {
            peak = peak.max(w);
            if peak > 0.0 {
                w / peak - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Most negative drawdown; 0 when the series never falls below its peak.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    drawdown_series(returns).into_iter().fold(0.0, f64::min)
}

/// Fraction of strictly positive returns.
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    returns.iter().filter(|r| **r > 0.0).count() as f64 / returns.len() as f64
}

/// Covariance over benchmark variance on the aligned sample; 0 when the
/// benchmark has no variance.
pub fn beta(returns: &[f64], benchmark: &[f64]) -> f64 {
    let variance = stats::covariance(benchmark, benchmark);
    if variance.abs() < 1e-300 {
        return 0.0;
    }
    stats::covariance(returns, benchmark) / variance
}

/// `(alpha, beta)` on the dates both series share, `None` without overlap.
fn alpha_beta(
    returns: &ReturnSeries,
    benchmark: &ReturnSeries,
    annual: f64,
    params: &MetricsParams,
) -> Option<(f64, f64)> {
    let (dates, own, bench) = align_pair(returns, benchmark);
    if dates.is_empty() {
        return None;
    }
    let b = beta(&own, &bench);
    let bench_annual = annual_return(total_return(&bench), bench.len(), params.periods_per_year);
    let rf = params.risk_free_rate;
    let alpha = annual - (rf + b * (bench_annual - rf));
    Some((alpha, b))
}
