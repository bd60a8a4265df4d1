//! Analysis runner: wires signals, regimes, metrics and risk together.
//!
//! Entry points:
//! - `analyze_instrument()`: every per-instrument analysis for one series.
//! - `analyze_universe()`: the same across many series, fanned out with rayon.
//! - `analyze_portfolio()`: weighted returns, optimizer, frontier, benchmarks.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use alphalab_core::domain::{PriceSeries, ReturnSeries, SeriesError, WeightVector};
use alphalab_core::regime::{
    classify_advanced, classify_regimes, regime_outlook, regime_performance, MarketOutlook, Regime,
    RegimeAssessment, RegimePerformance, Sector, SectorRotation,
};
use alphalab_core::signals::{analyze, SignalReport};

use crate::benchmarks::{suggest_benchmarks, BenchmarkSuggestion};
use crate::config::AnalysisConfig;
use crate::forward_risk::ForwardRiskMetrics;
use crate::frontier::{sample_frontier, FrontierPoint};
use crate::metrics::MetricsBundle;
use crate::monte_carlo::{simulate, MonteCarloResult};
use crate::optimizer::{optimize, OptimizationResult, OptimizeError};
use crate::portfolio::AssetReturns;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("optimizer error: {0}")]
    Optimize(#[from] OptimizeError),
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

// ─── Context ─────────────────────────────────────────────────────────

/// Market-wide inputs shared by every instrument in a run.
#[derive(Debug, Clone, Default)]
pub struct MarketContext {
    /// Benchmark returns for alpha/beta.
    pub benchmark: Option<ReturnSeries>,
    /// Latest VIX close.
    pub vix: Option<f64>,
    pub rotation: Option<SectorRotation>,
}

impl MarketContext {
    /// Build a context from a universe. SPY (or `benchmark` when given)
    /// becomes the benchmark; sector ETFs in the universe feed the rotation
    /// signal.
    pub fn from_universe(
        universe: &[PriceSeries],
        benchmark: Option<&PriceSeries>,
        vix: Option<f64>,
        lookback: usize,
    ) -> Self {
        let spy = benchmark.or_else(|| universe.iter().find(|s| s.symbol() == "SPY"));

        let sectors: BTreeMap<Sector, Vec<f64>> = universe
            .iter()
            .filter_map(|s| Sector::from_ticker(s.symbol()).map(|sector| (sector, s.prices())))
            .collect();
        let rotation = match spy {
            Some(spy) if !sectors.is_empty() => {
                SectorRotation::compute(&sectors, &spy.prices(), lookback)
            }
            _ => None,
        };

        Self {
            benchmark: spy.map(PriceSeries::returns),
            vix,
            rotation,
        }
    }
}

// ─── Results ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSummary {
    pub current: Option<Regime>,
    pub volatility_median: Option<f64>,
    pub performance: Vec<RegimePerformance>,
    pub assessment: RegimeAssessment,
    pub outlook: MarketOutlook,
}

/// Everything computed for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentAnalysis {
    pub symbol: String,
    pub observations: usize,
    pub signal: SignalReport,
    pub metrics: MetricsBundle,
    pub regime: RegimeSummary,
    pub forward_risk: Option<ForwardRiskMetrics>,
    pub monte_carlo: Option<MonteCarloResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub weights: WeightVector,
    pub metrics: MetricsBundle,
    pub forward_risk: Option<ForwardRiskMetrics>,
    pub optimization: OptimizationResult,
    pub frontier: Vec<FrontierPoint>,
    pub benchmarks: Vec<BenchmarkSuggestion>,
}

// ─── Entry points ────────────────────────────────────────────────────

/// Run every per-instrument analysis on `series`.
pub fn analyze_instrument(
    series: &PriceSeries,
    context: &MarketContext,
    config: &AnalysisConfig,
) -> InstrumentAnalysis {
    let symbol = series.symbol();
    let returns = series.returns();

    let signal = analyze(series, symbol, &config.signal, &config.filter);
    let metrics = MetricsBundle::compute(&returns, context.benchmark.as_ref(), &config.metrics);

    let regime = summarize_regimes(series, context, config);

    let forward_risk = ForwardRiskMetrics::compute(returns.values());
    let monte_carlo = simulate(returns.values(), &config.monte_carlo);

    tracing::debug!(
        symbol,
        action = ?signal.primary.action,
        regime = ?regime.current,
        "instrument analyzed"
    );

    InstrumentAnalysis {
        symbol: symbol.to_string(),
        observations: series.len(),
        signal,
        metrics,
        regime,
        forward_risk,
        monte_carlo,
    }
}

/// Rolling, advanced and outlook regime views of one series.
pub fn summarize_regimes(
    series: &PriceSeries,
    context: &MarketContext,
    config: &AnalysisConfig,
) -> RegimeSummary {
    let prices = series.prices();
    let returns = series.returns();
    let regimes = classify_regimes(&returns, &config.regime.rolling);
    RegimeSummary {
        current: regimes.current(),
        volatility_median: regimes.volatility_median,
        performance: regime_performance(&returns, &regimes),
        assessment: classify_advanced(
            &prices,
            returns.values(),
            context.vix,
            context.rotation.as_ref(),
            &config.regime.advanced,
        ),
        outlook: regime_outlook(&prices, returns.values()),
    }
}

/// Analyze every series in parallel. Output order matches input order.
pub fn analyze_universe(
    universe: &[PriceSeries],
    context: &MarketContext,
    config: &AnalysisConfig,
) -> Vec<InstrumentAnalysis> {
    universe
        .par_iter()
        .map(|series| analyze_instrument(series, context, config))
        .collect()
}

/// Portfolio-level analysis. Without explicit `weights` the optimizer's
/// weights are used.
pub fn analyze_portfolio(
    universe: &[PriceSeries],
    weights: Option<&WeightVector>,
    benchmark: Option<&ReturnSeries>,
    config: &AnalysisConfig,
) -> Result<PortfolioAnalysis, RunError> {
    let assets = AssetReturns::from_prices(universe);
    let optimization = optimize(&assets, &config.optimizer)?;
    let frontier = sample_frontier(&assets.moments(config.optimizer.periods_per_year), &config.frontier);

    let weights = weights.cloned().unwrap_or_else(|| optimization.weights.clone());
    if !weights.is_fully_invested(1e-6) {
        tracing::warn!(sum = weights.sum(), "portfolio weights are not fully invested");
    }
    let returns = assets.portfolio_returns(&weights)?;
    let metrics = MetricsBundle::compute(&returns, benchmark, &config.metrics);
    let forward_risk = ForwardRiskMetrics::compute(returns.values());

    Ok(PortfolioAnalysis {
        benchmarks: suggest_benchmarks(assets.symbols()),
        weights,
        metrics,
        forward_risk,
        optimization,
        frontier,
    })
}
