//! Monte Carlo forward simulation of cumulative wealth.
//!
//! Each path draws `horizon` normal returns with the historical mean and
//! sample standard deviation and compounds them from 1.0. Paths run in
//! parallel with `rayon`; every path owns an RNG derived from
//! `(master seed, "monte_carlo", path index)`, so the result does not depend
//! on thread count or scheduling.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use alphalab_core::rng::RngHierarchy;
use alphalab_core::stats;

const STREAM: &str = "monte_carlo";

// ─── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloParams {
    /// Number of simulated paths (default 1000).
    pub simulations: usize,
    /// Steps per path in trading days (default 252).
    pub horizon: usize,
    /// Master seed for the per-path RNG streams.
    pub seed: u64,
    /// Keep every path in the result.
    pub keep_paths: bool,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            simulations: 1000,
            horizon: 252,
            seed: 42,
            keep_paths: false,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Terminal wealth percentiles (wealth starts at 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalPercentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl TerminalPercentiles {
    fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p5: stats::percentile_sorted(sorted, 5.0),
            p25: stats::percentile_sorted(sorted, 25.0),
            p50: stats::percentile_sorted(sorted, 50.0),
            p75: stats::percentile_sorted(sorted, 75.0),
            p95: stats::percentile_sorted(sorted, 95.0),
        }
    }

    pub fn is_monotone(&self) -> bool {
        self.p5 <= self.p25 && self.p25 <= self.p50 && self.p50 <= self.p75 && self.p75 <= self.p95
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub percentiles: TerminalPercentiles,
    /// Fraction of paths ending above 1.0.
    pub probability_of_gain: f64,
    /// Fraction of paths ending below 1.0.
    pub probability_of_loss: f64,
    /// Fraction of paths ending below 0.9.
    pub probability_of_loss_over_10pct: f64,
    pub mean_terminal: f64,
    /// Daily drift and volatility the paths were drawn with.
    pub daily_mean: f64,
    pub daily_std: f64,
    pub simulations: usize,
    pub horizon: usize,
    /// Terminal value of each path, in path order.
    pub terminal_values: Vec<f64>,
    /// Full wealth paths (`horizon` values each) when `keep_paths` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<Vec<f64>>>,
}

// ─── Simulation ──────────────────────────────────────────────────────

/// Simulate forward wealth paths from historical periodic returns.
///
/// Non-finite returns are skipped. Returns `None` when no finite return
/// remains or when `simulations` or `horizon` is zero.
pub fn simulate(returns: &[f64], params: &MonteCarloParams) -> Option<MonteCarloResult> {
    let clean: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
    if clean.is_empty() {
        tracing::warn!("no finite returns for monte carlo simulation");
        return None;
    }
    if params.simulations == 0 || params.horizon == 0 {
        tracing::warn!(
            simulations = params.simulations,
            horizon = params.horizon,
            "empty monte carlo configuration"
        );
        return None;
    }

    let daily_mean = stats::mean(&clean);
    let daily_std = stats::std_dev(&clean);
    let hierarchy = RngHierarchy::new(params.seed);

    let paths: Vec<Vec<f64>> = (0..params.simulations)
        .into_par_iter()
        .map(|i| {
            let mut rng = hierarchy.rng_for(STREAM, i as u64);
            simulate_path(&mut rng, daily_mean, daily_std, params.horizon)
        })
        .collect();

    let terminal_values: Vec<f64> = paths
        .iter()
        .map(|p| p.last().copied().unwrap_or(1.0))
        .collect();
    let mut sorted = terminal_values.clone();
    sorted.sort_by(f64::total_cmp);

    tracing::debug!(
        simulations = params.simulations,
        horizon = params.horizon,
        daily_mean,
        daily_std,
        "monte carlo complete"
    );

    Some(MonteCarloResult {
        percentiles: TerminalPercentiles::from_sorted(&sorted),
        probability_of_gain: fraction(&terminal_values, |v| v > 1.0),
        probability_of_loss: fraction(&terminal_values, |v| v < 1.0),
        probability_of_loss_over_10pct: fraction(&terminal_values, |v| v < 0.9),
        mean_terminal: stats::mean(&terminal_values),
        daily_mean,
        daily_std,
        simulations: params.simulations,
        horizon: params.horizon,
        terminal_values,
        paths: params.keep_paths.then_some(paths),
    })
}

fn fraction(values: &[f64], pred: impl Fn(f64) -> bool) -> f64 {
    values.iter().filter(|v| pred(**v)).count() as f64 / values.len() as f64
}

/// One compounded wealth path of `horizon` steps.
fn simulate_path(rng: &mut StdRng, mean: f64, std: f64, horizon: usize) -> Vec<f64> {
    let mut wealth = 1.0;
    (0..horizon)
        .map(|_| {
            wealth *= 1.0 + mean + std * rng.sample::<f64, _>(StandardNormal);
            wealth
        })
        .collect()
}
