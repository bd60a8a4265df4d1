//! Benchmark suggestions from portfolio composition.

use serde::{Deserialize, Serialize};

use alphalab_core::domain::{ReturnSeries, SeriesError, WeightVector};

use crate::portfolio::AssetReturns;

/// A benchmark ticker and why it was suggested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSuggestion {
    pub symbol: String,
    pub reason: String,
}

/// `(benchmark, trigger tickers, reason)`, checked in order after SPY.
const RULES: &[(&str, &[&str], &str)] = &[
    (
        "QQQ",
        &["QQQ", "XLK", "VGT", "SOXX"],
        "Tech exposure warrants Nasdaq comparison",
    ),
    ("IWM", &["IWM", "VB", "IJR"], "Small cap exposure present"),
    (
        "VT",
        &["VT", "VXUS", "EFA", "VEA", "IEFA"],
        "International holdings present",
    ),
    (
        "AGG",
        &["AGG", "BND", "TLT", "IEF", "SHY"],
        "Fixed income component",
    ),
];

/// Suggest comparison benchmarks for a set of holdings. SPY is always
/// first; the rest follow the holdings. Tickers match case-insensitively.
pub fn suggest_benchmarks<S: AsRef<str>>(tickers: &[S]) -> Vec<BenchmarkSuggestion> {
    let held: Vec<String> = tickers
        .iter()
        .map(|t| t.as_ref().trim().to_ascii_uppercase())
        .collect();

    let mut out = vec![BenchmarkSuggestion {
        symbol: "SPY".into(),
        reason: "Core US large cap benchmark".into(),
    }];
    for (symbol, triggers, reason) in RULES {
        if held.iter().any(|t| triggers.contains(&t.as_str())) {
            out.push(BenchmarkSuggestion {
                symbol: (*symbol).into(),
                reason: (*reason).into(),
            });
        }
    }
    out
}

/// Daily-rebalanced 60/40 stock/bond blend on the dates both series share.
pub fn sixty_forty(stocks: &ReturnSeries, bonds: &ReturnSeries) -> Result<ReturnSeries, SeriesError> {
    let assets = AssetReturns::from_returns(&[stocks, bonds]);
    let weights = WeightVector::new(vec![
        (stocks.symbol().to_string(), 0.6),
        (bonds.symbol().to_string(), 0.4),
    ]);
    assets.portfolio_returns(&weights)
}
