//! AlphaLab CLI: signal, metrics, regime, risk and allocation commands.
//!
//! Every command reads `date,close` CSV files and prints JSON to stdout:
//! - `signal`: primary and filter-based signals with their agreement
//! - `metrics`: performance metrics, optionally against a benchmark
//! - `regime`: rolling, advanced and outlook regime classification
//! - `risk`: VaR/CVaR and a Monte Carlo projection
//! - `optimize`: optimizer weights, frontier and benchmark suggestions
//! - `analyze`: every per-instrument analysis across a universe
//!
//! Logs go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=alphalab_runner=debug`)
//! to change verbosity.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use alphalab_core::domain::{PriceSeries, WeightVector};
use alphalab_core::signals::analyze;
use alphalab_runner::config::AnalysisConfig;
use alphalab_runner::data_loader::load_price_csv;
use alphalab_runner::forward_risk::ForwardRiskMetrics;
use alphalab_runner::metrics::MetricsBundle;
use alphalab_runner::monte_carlo::{simulate, MonteCarloResult};
use alphalab_runner::optimizer::Objective;
use alphalab_runner::runner::{analyze_portfolio, analyze_universe, summarize_regimes, MarketContext};

#[derive(Parser)]
#[command(
    name = "alphalab",
    about = "AlphaLab CLI: signals, regimes, risk and allocation from price files"
)]
struct Cli {
    /// Path to a TOML analysis config. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score instruments with the indicator and filter signals.
    Signal {
        /// Price files; the file stem is the symbol (spy.csv → SPY).
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Backward-looking performance metrics.
    Metrics {
        /// Price file.
        file: PathBuf,

        /// Benchmark price file for alpha and beta.
        #[arg(long)]
        benchmark: Option<PathBuf>,
    },
    /// Market regime classification.
    Regime {
        /// Price file.
        file: PathBuf,

        /// Latest VIX close.
        #[arg(long)]
        vix: Option<f64>,

        /// SPY price file, required for sector rotation.
        #[arg(long)]
        spy: Option<PathBuf>,

        /// Sector ETF price files (XLK, XLU, ...).
        #[arg(long, num_args = 1..)]
        sectors: Vec<PathBuf>,
    },
    /// Forward risk metrics and Monte Carlo projection.
    Risk {
        /// Price file.
        file: PathBuf,

        /// Number of simulated paths (overrides config).
        #[arg(long)]
        simulations: Option<usize>,

        /// Projection horizon in trading days (overrides config).
        #[arg(long)]
        horizon: Option<usize>,

        /// Master seed (overrides config).
        #[arg(long)]
        seed: Option<u64>,

        /// Include every simulated path in the output.
        #[arg(long, default_value_t = false)]
        paths: bool,
    },
    /// Portfolio optimization, frontier and benchmark suggestions.
    Optimize {
        /// Price files for the candidate assets.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Objective (overrides config).
        #[arg(long, value_enum)]
        objective: Option<ObjectiveArg>,

        /// Evaluate fixed weights instead of the optimizer's, e.g. SPY=0.6,AGG=0.4.
        #[arg(long, value_delimiter = ',')]
        weights: Vec<String>,

        /// Benchmark price file for alpha and beta.
        #[arg(long)]
        benchmark: Option<PathBuf>,
    },
    /// Every per-instrument analysis across a universe.
    Analyze {
        /// Price files.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Benchmark price file. Defaults to SPY when it is in the universe.
        #[arg(long)]
        benchmark: Option<PathBuf>,

        /// Latest VIX close.
        #[arg(long)]
        vix: Option<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectiveArg {
    MaxSharpe,
    MinVariance,
}

impl From<ObjectiveArg> for Objective {
    fn from(arg: ObjectiveArg) -> Self {
        match arg {
            ObjectiveArg::MaxSharpe => Objective::MaxSharpe,
            ObjectiveArg::MinVariance => Objective::MinVariance,
        }
    }
}

#[derive(Serialize)]
struct RiskReport {
    symbol: String,
    forward_risk: Option<ForwardRiskMetrics>,
    monte_carlo: Option<MonteCarloResult>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::Signal { files } => {
            let universe = load_all(&files)?;
            let reports: Vec<_> = universe
                .iter()
                .map(|s| analyze(s, s.symbol(), &config.signal, &config.filter))
                .collect();
            emit(&reports, cli.compact)
        }
        Commands::Metrics { file, benchmark } => {
            let series = load(&file)?;
            let bench = benchmark.as_deref().map(load).transpose()?;
            let metrics = MetricsBundle::compute(
                &series.returns(),
                bench.as_ref().map(PriceSeries::returns).as_ref(),
                &config.metrics,
            );
            emit(&metrics, cli.compact)
        }
        Commands::Regime {
            file,
            vix,
            spy,
            sectors,
        } => {
            let series = load(&file)?;
            let spy = spy.as_deref().map(load).transpose()?;
            if !sectors.is_empty() && spy.is_none() {
                bail!("--sectors requires --spy");
            }
            let sector_series = load_all(&sectors)?;
            let context = MarketContext::from_universe(
                &sector_series,
                spy.as_ref(),
                vix,
                config.regime.advanced.lookback,
            );
            emit(&summarize_regimes(&series, &context, &config), cli.compact)
        }
        Commands::Risk {
            file,
            simulations,
            horizon,
            seed,
            paths,
        } => {
            let series = load(&file)?;
            let mc = &mut config.monte_carlo;
            if let Some(n) = simulations {
                mc.simulations = n;
            }
            if let Some(h) = horizon {
                mc.horizon = h;
            }
            if let Some(s) = seed {
                mc.seed = s;
            }
            mc.keep_paths |= paths;
            config.validate()?;

            let returns = series.returns();
            let report = RiskReport {
                symbol: series.symbol().to_string(),
                forward_risk: ForwardRiskMetrics::compute(returns.values()),
                monte_carlo: simulate(returns.values(), &config.monte_carlo),
            };
            emit(&report, cli.compact)
        }
        Commands::Optimize {
            files,
            objective,
            weights,
            benchmark,
        } => {
            let universe = load_all(&files)?;
            if let Some(o) = objective {
                config.optimizer.objective = o.into();
            }
            let fixed = if weights.is_empty() {
                None
            } else {
                Some(parse_weights(&weights)?)
            };
            let bench = benchmark.as_deref().map(load).transpose()?;
            let result = analyze_portfolio(
                &universe,
                fixed.as_ref(),
                bench.as_ref().map(PriceSeries::returns).as_ref(),
                &config,
            )?;
            emit(&result, cli.compact)
        }
        Commands::Analyze {
            files,
            benchmark,
            vix,
        } => {
            let universe = load_all(&files)?;
            let bench = benchmark.as_deref().map(load).transpose()?;
            let context = MarketContext::from_universe(
                &universe,
                bench.as_ref(),
                vix,
                config.regime.advanced.lookback,
            );
            emit(&analyze_universe(&universe, &context, &config), cli.compact)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<PriceSeries> {
    load_price_csv(path, None).with_context(|| format!("loading prices from {}", path.display()))
}

fn load_all(paths: &[PathBuf]) -> Result<Vec<PriceSeries>> {
    tracing::debug!(files = paths.len(), "loading price files");
    paths.iter().map(|p| load(p)).collect()
}

/// Parse `SYMBOL=weight` pairs.
fn parse_weights(pairs: &[String]) -> Result<WeightVector> {
    let entries = pairs
        .iter()
        .map(|pair| -> Result<(String, f64)> {
            let Some((symbol, weight)) = pair.split_once('=') else {
                bail!("weight '{pair}' is not SYMBOL=VALUE");
            };
            let weight: f64 = weight
                .trim()
                .parse()
                .with_context(|| format!("weight for {symbol} is not a number"))?;
            Ok((symbol.trim().to_ascii_uppercase(), weight))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(WeightVector::new(entries))
}

fn emit<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
