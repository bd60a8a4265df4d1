//! Efficient-frontier sampling with random long-only portfolios.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use alphalab_core::rng::RngHierarchy;
use alphalab_core::stats;

use crate::portfolio::Moments;

const STREAM: &str = "frontier";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontierParams {
    pub samples: usize,
    pub seed: u64,
}

impl Default for FrontierParams {
    fn default() -> Self {
        Self {
            samples: 500,
            seed: 42,
        }
    }
}

/// One random portfolio on the risk/return plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    pub expected_return: f64,
    pub volatility: f64,
    /// `expected_return / volatility`, 0 when volatility is 0.
    pub sharpe: f64,
    pub weights: Vec<f64>,
}

/// Draw `samples` uniform weight vectors, normalize each to sum 1 and
/// record its annualized return, volatility and Sharpe ratio.
///
/// Sample `i` always uses the RNG stream `("frontier", i)`, so the cloud is
/// reproducible for a seed. Empty moments give an empty cloud.
pub fn sample_frontier(moments: &Moments, params: &FrontierParams) -> Vec<FrontierPoint> {
    let n = moments.len();
    if n == 0 {
        return Vec::new();
    }
    let hierarchy = RngHierarchy::new(params.seed);

    (0..params.samples)
        .into_par_iter()
        .map(|i| {
            let mut rng = hierarchy.rng_for(STREAM, i as u64);
            let raw: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
            let total: f64 = raw.iter().sum();
            let weights: Vec<f64> = if total > 0.0 {
                raw.iter().map(|w| w / total).collect()
            } else {
                vec![1.0 / n as f64; n]
            };
            point(moments, weights)
        })
        .collect()
}

fn point(moments: &Moments, weights: Vec<f64>) -> FrontierPoint {
    let expected_return = moments.expected_return(&weights);
    let volatility = moments.volatility(&weights);
    FrontierPoint {
        expected_return,
        volatility,
        sharpe: stats::safe_ratio(expected_return, volatility),
        weights,
    }
}

/// Index of the highest-Sharpe sample.
pub fn best_sharpe(points: &[FrontierPoint]) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.sharpe.total_cmp(&b.1.sharpe))
        .map(|(i, _)| i)
}
