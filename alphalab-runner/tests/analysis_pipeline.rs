//! End-to-end: CSV files and a TOML config on disk through the runner.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use tempfile::TempDir;

use alphalab_core::signals::SignalAction;
use alphalab_runner::config::AnalysisConfig;
use alphalab_runner::data_loader::load_price_csv;
use alphalab_runner::optimizer::Objective;
use alphalab_runner::runner::{analyze_portfolio, analyze_universe, MarketContext};

// ─── Helpers ─────────────────────────────────────────────────────────

fn write_prices(dir: &Path, symbol: &str, prices: &[f64]) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut body = String::from("date,close\n");
    for (i, p) in prices.iter().enumerate() {
        body.push_str(&format!("{},{p}\n", start + Duration::days(i as i64)));
    }
    fs::write(dir.join(format!("{}.csv", symbol.to_lowercase())), body).unwrap();
}

fn geometric(n: usize, daily: f64) -> Vec<f64> {
    (0..n).map(|i| 100.0 * (1.0 + daily).powi(i as i32)).collect()
}

fn noisy(n: usize, daily: f64, amp: f64) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 * (1.0 + daily).powi(i as i32) * (1.0 + amp * (i as f64 * 0.7).sin()))
        .collect()
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_prices(dir.path(), "SPY", &noisy(300, 0.0008, 0.01));
    write_prices(dir.path(), "QQQ", &geometric(300, 0.004));
    write_prices(dir.path(), "TLT", &noisy(300, 0.0002, 0.005));
    fs::write(
        dir.path().join("alphalab.toml"),
        "[monte_carlo]\nsimulations = 100\nhorizon = 60\nseed = 11\n\n\
         [frontier]\nsamples = 40\n\n[optimizer]\nobjective = \"min_variance\"\n",
    )
    .unwrap();
    dir
}

// ─── Tests ───────────────────────────────────────────────────────────

#[test]
fn universe_from_disk() {
    let dir = fixture();
    let config = AnalysisConfig::load(dir.path().join("alphalab.toml")).unwrap();
    let universe: Vec<_> = ["spy", "qqq", "tlt"]
        .iter()
        .map(|s| load_price_csv(dir.path().join(format!("{s}.csv")), None).unwrap())
        .collect();

    let context = MarketContext::from_universe(&universe, None, None, 60);
    let results = analyze_universe(&universe, &context, &config);

    assert_eq!(results.len(), 3);
    let qqq = &results[1];
    assert_eq!(qqq.symbol, "QQQ");
    assert!(qqq.signal.primary.action.is_buy());
    assert_eq!(qqq.signal.primary.trend(), 3.0);
    assert!(qqq.metrics.beta.is_some());

    let mc = qqq.monte_carlo.as_ref().unwrap();
    assert_eq!(mc.simulations, 100);
    assert_eq!(mc.horizon, 60);

    let tlt = &results[2];
    assert!(tlt.signal.secondary.is_none());
    assert_ne!(tlt.signal.primary.action, SignalAction::StrongBuy);
}

#[test]
fn portfolio_from_disk_serializes() {
    let dir = fixture();
    let config = AnalysisConfig::load(dir.path().join("alphalab.toml")).unwrap();
    assert_eq!(config.optimizer.objective, Objective::MinVariance);

    let universe: Vec<_> = ["spy", "tlt"]
        .iter()
        .map(|s| load_price_csv(dir.path().join(format!("{s}.csv")), None).unwrap())
        .collect();
    let benchmark = universe[0].returns();
    let result = analyze_portfolio(&universe, None, Some(&benchmark), &config).unwrap();

    assert!(result.weights.is_fully_invested(1e-6));
    assert_eq!(result.frontier.len(), 40);
    assert!(result.metrics.beta.is_some());

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["optimization"]["weights"].is_object() || json["optimization"]["weights"].is_array());
    assert_eq!(json["benchmarks"][0]["symbol"], "SPY");
}

#[test]
fn runs_are_reproducible() {
    let dir = fixture();
    let config = AnalysisConfig::load(dir.path().join("alphalab.toml")).unwrap();
    let spy = vec![load_price_csv(dir.path().join("spy.csv"), None).unwrap()];
    let context = MarketContext::default();

    let a = analyze_universe(&spy, &context, &config);
    let b = analyze_universe(&spy, &context, &config);
    assert_eq!(a, b);
}
