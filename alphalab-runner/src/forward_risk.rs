//! Forward risk: VaR, CVaR and loss probabilities from historical returns.
//!
//! These complement `MetricsBundle` with tail statistics for the risk
//! table. All functions are pure: periodic returns in, scalar out.

use serde::{Deserialize, Serialize};

use alphalab_core::stats::{self, PERIODS_PER_YEAR};

use crate::metrics::max_drawdown;

/// Tail risk statistics computed from a return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardRiskMetrics {
    /// Mean return × 252.
    pub expected_annual_return: f64,

    /// Sample std × √252.
    pub expected_volatility: f64,

    /// Daily return at the 5th percentile. Negative for a loss (e.g. −0.02
    /// means a 2% daily loss is exceeded on 5% of days).
    pub var_95: f64,

    /// Daily return at the 1st percentile.
    pub var_99: f64,

    /// Conditional Value at Risk at 95%: mean of returns at or below `var_95`.
    pub cvar_95: f64,

    /// Conditional Value at Risk at 99%.
    pub cvar_99: f64,

    /// Fraction of periods with a negative return.
    pub probability_of_daily_loss: f64,

    /// Historical maximum drawdown, used as the forward estimate.
    pub estimated_max_drawdown: f64,

    /// Number of return observations used.
    pub sample_size: usize,
}

impl ForwardRiskMetrics {
    /// Compute all forward risk metrics. Non-finite returns are skipped;
    /// `None` when nothing remains.
    pub fn compute(returns: &[f64]) -> Option<Self> {
        let clean: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
        if clean.is_empty() {
            tracing::warn!("no finite returns for forward risk");
            return None;
        }
        let var_95 = value_at_risk(&clean, 0.95);
        let var_99 = value_at_risk(&clean, 0.99);

        Some(Self {
            expected_annual_return: stats::mean(&clean) * PERIODS_PER_YEAR,
            expected_volatility: stats::std_dev(&clean) * PERIODS_PER_YEAR.sqrt(),
            var_95,
            var_99,
            cvar_95: conditional_var(&clean, var_95),
            cvar_99: conditional_var(&clean, var_99),
            probability_of_daily_loss: clean.iter().filter(|r| **r < 0.0).count() as f64
                / clean.len() as f64,
            estimated_max_drawdown: max_drawdown(&clean),
            sample_size: clean.len(),
        })
    }
}

/// Empirical return quantile at `1 − confidence`, linearly interpolated.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    stats::quantile(returns, 1.0 - confidence)
}

/// Mean of the returns at or below `var`. Falls back to `var` itself when
/// no return qualifies.
pub fn conditional_var(returns: &[f64], var: f64) -> f64 {
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var).collect();
    if tail.is_empty() {
        var
    } else {
        stats::mean(&tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// −0.05, −0.04, …, 0.94 in steps of 0.01 (100 values).
    fn ladder() -> Vec<f64> {
        (0..100).map(|i| (i as f64 - 5.0) / 100.0).collect()
    }

    #[test]
    fn var_interpolates_linearly() {
        // Rank 0.05 × 99 = 4.95 → between −0.01 and 0.00
        let var = value_at_risk(&ladder(), 0.95);
        assert!((var - (-0.0005)).abs() < 1e-12);
    }

    #[test]
    fn cvar_averages_the_tail() {
        let r = ladder();
        let var = value_at_risk(&r, 0.95);
        // −0.05 … −0.01 are at or below var
        assert!((conditional_var(&r, var) - (-0.03)).abs() < 1e-12);
    }

    #[test]
    fn cvar_is_no_better_than_var() {
        let m = ForwardRiskMetrics::compute(&ladder()).unwrap();
        assert!(m.cvar_95 <= m.var_95);
        assert!(m.cvar_99 <= m.var_99);
        assert!(m.var_99 <= m.var_95);
    }

    #[test]
    fn expected_return_and_loss_probability() {
        let m = ForwardRiskMetrics::compute(&[0.01, -0.02, 0.03, -0.01]).unwrap();
        assert!((m.expected_annual_return - 0.0025 * 252.0).abs() < 1e-12);
        assert_eq!(m.probability_of_daily_loss, 0.5);
        assert_eq!(m.sample_size, 4);
    }

    #[test]
    fn drawdown_matches_metrics() {
        let r = [0.1, -0.2, 0.1];
        let m = ForwardRiskMetrics::compute(&r).unwrap();
        assert_eq!(m.estimated_max_drawdown, max_drawdown(&r));
    }

    #[test]
    fn nan_is_skipped_and_empty_is_none() {
        let m = ForwardRiskMetrics::compute(&[f64::NAN, 0.01, 0.02]).unwrap();
        assert_eq!(m.sample_size, 2);
        assert!(ForwardRiskMetrics::compute(&[f64::NAN]).is_none());
        assert!(ForwardRiskMetrics::compute(&[]).is_none());
    }
}
