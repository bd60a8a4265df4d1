//! AlphaLab Runner: performance metrics, forward risk, Monte Carlo,
//! allocation optimizer and analysis orchestration.
//!
//! This crate builds on `alphalab-core` to provide:
//! - Backward-looking metrics bundle with optional benchmark alpha/beta
//! - VaR/CVaR forward risk and seeded, parallel Monte Carlo wealth paths
//! - Long-only Sharpe / minimum-variance optimizer and frontier sampling
//! - Benchmark suggestions from holdings
//! - TOML configuration and CSV price loading
//! - Per-instrument, universe and portfolio runners

pub mod benchmarks;
pub mod config;
pub mod data_loader;
pub mod forward_risk;
pub mod frontier;
pub mod metrics;
pub mod monte_carlo;
pub mod optimizer;
pub mod portfolio;
pub mod runner;

pub use benchmarks::{sixty_forty, suggest_benchmarks, BenchmarkSuggestion};
pub use config::{AnalysisConfig, ConfigError, RegimeConfig};
pub use data_loader::{load_price_csv, read_prices, LoadError};
pub use forward_risk::ForwardRiskMetrics;
pub use frontier::{best_sharpe, sample_frontier, FrontierParams, FrontierPoint};
pub use metrics::{MetricsBundle, MetricsParams};
pub use monte_carlo::{simulate, MonteCarloParams, MonteCarloResult, TerminalPercentiles};
pub use optimizer::{
    optimize, optimize_moments, Objective, OptimizationResult, OptimizeError, OptimizerParams,
};
pub use portfolio::{AssetReturns, Moments};
pub use runner::{
    analyze_instrument, analyze_portfolio, analyze_universe, summarize_regimes, InstrumentAnalysis,
    MarketContext, PortfolioAnalysis, RegimeSummary, RunError,
};
