//! Property tests for the risk engines.
//!
//! Invariants:
//! 1. Monte Carlo terminal percentiles are monotone for every seed.
//! 2. Optimizer output lies on the simplex for any valid moments.
//! 3. `1 + total_return` equals the compounded product of returns.
//! 4. CVaR never exceeds VaR.

use proptest::prelude::*;

use alphalab_runner::forward_risk::ForwardRiskMetrics;
use alphalab_runner::metrics::{cumulative_wealth, total_return};
use alphalab_runner::monte_carlo::{simulate, MonteCarloParams};
use alphalab_runner::optimizer::{optimize_moments, Objective, OptimizerParams};
use alphalab_runner::portfolio::Moments;

fn returns_strategy(min: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.05f64..0.05, min..120)
}

/// Covariance `AᵀA + εI` is symmetric positive definite.
fn moments_strategy() -> impl Strategy<Value = Moments> {
    (1usize..6).prop_flat_map(|n| {
        (
            prop::collection::vec(-0.1f64..0.3, n),
            prop::collection::vec(-0.3f64..0.3, n * n),
        )
            .prop_map(move |(means, a)| {
                let covariance = (0..n)
                    .map(|i| {
                        (0..n)
                            .map(|j| {
                                let dot: f64 = (0..n).map(|k| a[k * n + i] * a[k * n + j]).sum();
                                dot + if i == j { 1e-3 } else { 0.0 }
                            })
                            .collect()
                    })
                    .collect();
                Moments {
                    symbols: (0..n).map(|i| format!("A{i}")).collect(),
                    means,
                    covariance,
                }
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn monte_carlo_percentiles_are_monotone(returns in returns_strategy(1), seed in any::<u64>()) {
        let params = MonteCarloParams { simulations: 64, horizon: 30, seed, keep_paths: false };
        let result = simulate(&returns, &params).unwrap();
        let p = result.percentiles;
        prop_assert!(p.p5 <= p.p25 && p.p25 <= p.p50 && p.p50 <= p.p75 && p.p75 <= p.p95);
        prop_assert!(result.probability_of_loss_over_10pct <= result.probability_of_loss);
    }

    #[test]
    fn optimizer_output_is_on_simplex(moments in moments_strategy(), min_var in any::<bool>()) {
        let objective = if min_var { Objective::MinVariance } else { Objective::MaxSharpe };
        let params = OptimizerParams { objective, ..OptimizerParams::default() };
        let result = optimize_moments(&moments, &params).unwrap();
        let weights = result.weights.values();
        prop_assert_eq!(weights.len(), moments.len());
        prop_assert!((weights.iter().sum::<f64>() - 1.0).abs() <= 1e-6);
        prop_assert!(weights.iter().all(|w| *w >= 0.0 && *w <= 1.0 + 1e-12));
    }

    #[test]
    fn total_return_matches_compounding(returns in returns_strategy(1)) {
        let product: f64 = returns.iter().map(|r| 1.0 + r).product();
        prop_assert!((1.0 + total_return(&returns) - product).abs() < 1e-9);
        let wealth = cumulative_wealth(&returns);
        prop_assert!((wealth[wealth.len() - 1] - product).abs() < 1e-9);
    }

    #[test]
    fn cvar_is_no_better_than_var(returns in returns_strategy(5)) {
        let m = ForwardRiskMetrics::compute(&returns).unwrap();
        prop_assert!(m.cvar_95 <= m.var_95 + 1e-15);
        prop_assert!(m.cvar_99 <= m.var_99 + 1e-15);
    }
}
