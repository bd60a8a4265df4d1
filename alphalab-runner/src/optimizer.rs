//! Long-only portfolio optimizer on the probability simplex.
//!
//! Maximizes the Sharpe ratio `(μ·w) / sqrt(wᵀΣw)` or minimizes the variance
//! `wᵀΣw` subject to `Σw = 1, 0 ≤ w ≤ 1`. The solver is projected-gradient
//! ascent with Armijo backtracking, seeded from equal weights. Every step is
//! projected back onto the simplex, so the output is always feasible.
//!
//! Failure is not an error: a non-finite objective or exhausting the
//! iteration budget returns the equal-weight seed with `converged = false`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use alphalab_core::domain::WeightVector;
use alphalab_core::stats::{self, PERIODS_PER_YEAR};

use crate::portfolio::{AssetReturns, Moments};

/// Sufficient-increase constant for the Armijo test.
const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-12;
const MAX_STEP: f64 = 1e3;

// ─── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Maximize expected return per unit volatility (no risk-free rate).
    #[default]
    MaxSharpe,
    /// Minimize portfolio variance.
    MinVariance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerParams {
    pub objective: Objective,
    pub max_iterations: usize,
    /// Stop when weights move less than this, or the objective improves
    /// by less than this, in one iteration.
    pub tolerance: f64,
    pub periods_per_year: f64,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            objective: Objective::MaxSharpe,
            max_iterations: 1000,
            tolerance: 1e-10,
            periods_per_year: PERIODS_PER_YEAR,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("no assets to optimize")]
    NoAssets,
    #[error("insufficient data: {observations} common observations < minimum 2")]
    InsufficientData { observations: usize },
    #[error("dimension mismatch: {means} expected returns vs covariance with {rows} rows")]
    DimensionMismatch { means: usize, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub objective: Objective,
    pub weights: WeightVector,
    /// Annualized `μ·w`.
    pub expected_return: f64,
    /// Annualized `sqrt(wᵀΣw)`.
    pub volatility: f64,
    /// `expected_return / volatility`, 0 when volatility is 0.
    pub sharpe: f64,
    pub iterations: usize,
    pub converged: bool,
    pub warnings: Vec<String>,
}

// ─── Entry points ────────────────────────────────────────────────────

/// Optimize weights over an aligned asset panel.
pub fn optimize(
    assets: &AssetReturns,
    params: &OptimizerParams,
) -> Result<OptimizationResult, OptimizeError> {
    if assets.asset_count() == 0 {
        return Err(OptimizeError::NoAssets);
    }
    if assets.observations() < 2 {
        return Err(OptimizeError::InsufficientData {
            observations: assets.observations(),
        });
    }
    optimize_moments(&assets.moments(params.periods_per_year), params)
}

/// Optimize weights from precomputed annualized moments.
pub fn optimize_moments(
    moments: &Moments,
    params: &OptimizerParams,
) -> Result<OptimizationResult, OptimizeError> {
    let n = moments.len();
    if n == 0 {
        return Err(OptimizeError::NoAssets);
    }
    let rows = moments.covariance.len();
    if rows != n || moments.covariance.iter().any(|row| row.len() != n) {
        return Err(OptimizeError::DimensionMismatch { means: n, rows });
    }

    let seed = vec![1.0 / n as f64; n];
    let (weights, iterations, converged, warnings) =
        match ascend(moments, &seed, params) {
            Ascent::Converged { weights, iterations } => (weights, iterations, true, Vec::new()),
            Ascent::Failed { reason, iterations } => {
                tracing::warn!(iterations, reason = %reason, "optimizer fell back to equal weights");
                let warning = format!("optimizer did not converge ({reason}); using equal weights");
                (seed, iterations, false, vec![warning])
            }
        };

    let expected_return = moments.expected_return(&weights);
    let volatility = moments.volatility(&weights);
    let sharpe = stats::safe_ratio(expected_return, volatility);

    Ok(OptimizationResult {
        objective: params.objective,
        weights: WeightVector::from_parts(&moments.symbols, &weights),
        expected_return,
        volatility,
        sharpe,
        iterations,
        converged,
        warnings,
    })
}

// ─── Solver ──────────────────────────────────────────────────────────

enum Ascent {
    Converged { weights: Vec<f64>, iterations: usize },
    Failed { reason: String, iterations: usize },
}

/// Objective to maximize. NaN when the Sharpe ratio is undefined.
fn objective_value(objective: Objective, m: &Moments, w: &[f64]) -> f64 {
    match objective {
        Objective::MaxSharpe => {
            let vol = m.volatility(w);
            if vol > 0.0 {
                m.expected_return(w) / vol
            } else {
                f64::NAN
            }
        }
        Objective::MinVariance => -m.variance(w),
    }
}

fn gradient(objective: Objective, m: &Moments, w: &[f64]) -> Vec<f64> {
    let sigma_w = m.covariance_times(w);
    match objective {
        Objective::MaxSharpe => {
            let vol = m.volatility(w);
            let ret = m.expected_return(w);
            m.means
                .iter()
                .zip(&sigma_w)
                .map(|(mu, sw)| mu / vol - ret * sw / vol.powi(3))
                .collect()
        }
        Objective::MinVariance => sigma_w.iter().map(|sw| -2.0 * sw).collect(),
    }
}

fn ascend(m: &Moments, seed: &[f64], params: &OptimizerParams) -> Ascent {
    let objective = params.objective;
    let mut w = seed.to_vec();
    let mut f = objective_value(objective, m, &w);
    if !f.is_finite() {
        return Ascent::Failed {
            reason: "objective is not finite at equal weights".into(),
            iterations: 0,
        };
    }

    let mut step = 1.0;
    for iteration in 1..=params.max_iterations {
        let g = gradient(objective, m, &w);
        if g.iter().any(|x| !x.is_finite()) {
            return Ascent::Failed {
                reason: "gradient is not finite".into(),
                iterations: iteration,
            };
        }

        // Backtrack until the projected step gives sufficient increase.
        let mut t = step;
        let mut accepted = None;
        while t >= MIN_STEP {
            let trial: Vec<f64> = w.iter().zip(&g).map(|(wi, gi)| wi + t * gi).collect();
            let candidate = project_to_simplex(&trial);
            let gain: f64 = g
                .iter()
                .zip(candidate.iter().zip(&w))
                .map(|(gi, (ci, wi))| gi * (ci - wi))
                .sum();
            let fc = objective_value(objective, m, &candidate);
            if fc.is_finite() && fc >= f + ARMIJO * gain {
                accepted = Some((candidate, fc, t));
                break;
            }
            t *= 0.5;
        }

        let Some((candidate, fc, t)) = accepted else {
            // No ascent direction left on the simplex.
            return Ascent::Converged {
                weights: w,
                iterations: iteration,
            };
        };

        let moved = candidate
            .iter()
            .zip(&w)
            .map(|(c, wi)| (c - wi).abs())
            .fold(0.0, f64::max);
        let improvement = fc - f;
        tracing::debug!(iteration, objective = fc, step = t, moved, "optimizer step");

        w = candidate;
        f = fc;
        step = (t * 2.0).min(MAX_STEP);

        if moved < params.tolerance || improvement.abs() < params.tolerance {
            return Ascent::Converged {
                weights: w,
                iterations: iteration,
            };
        }
    }

    Ascent::Failed {
        reason: format!("no convergence within {} iterations", params.max_iterations),
        iterations: params.max_iterations,
    }
}

/// Euclidean projection onto `{w : Σw = 1, w ≥ 0}`.
///
/// Sort-based algorithm of Duchi et al. (2008): find the largest `ρ` with
/// `u_ρ > (Σ_{j≤ρ} u_j − 1)/ρ` over the descending values `u`, then shift
/// and clip.
pub fn project_to_simplex(v: &[f64]) -> Vec<f64> {
    let mut sorted = v.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumulative = 0.0;
    let mut theta = 0.0;
    for (j, u) in sorted.iter().enumerate() {
        cumulative += u;
        let candidate = (cumulative - 1.0) / (j + 1) as f64;
        if u - candidate > 0.0 {
            theta = candidate;
        }
    }
    v.iter().map(|x| (x - theta).max(0.0)).collect()
}
