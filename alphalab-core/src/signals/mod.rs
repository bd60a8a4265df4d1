//! Signal scoring: primary indicator scorer, fixed-income rule table,
//! filter-based secondary scorer and the reconciler.
//!
//! Scorers are portfolio-agnostic pure functions of a price history. The
//! instrument class is resolved once, at [`score`], and selects either the
//! indicator scorer or the bond rule table.

pub mod bond;
pub mod filter_signal;
pub mod primary;
pub mod reconcile;

use serde::{Deserialize, Serialize};

use crate::domain::{BondSubclass, InstrumentClass, PriceSeries};
use crate::indicators::PivotLevels;

pub use filter_signal::FilterSignal;
pub use reconcile::{analyze, Agreement, SignalReport};

/// Bounds of the composite score.
pub const MAX_SCORE: f64 = 6.0;

/// Public five-level action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalAction {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl SignalAction {
    /// ≥4 StrongBuy, ≥2 Buy, ≤−4 StrongSell, ≤−2 Sell, otherwise Hold.
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            Self::StrongBuy
        } else if score >= 2.0 {
            Self::Buy
        } else if score <= -4.0 {
            Self::StrongSell
        } else if score <= -2.0 {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    pub fn is_buy(self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }

    pub fn is_sell(self) -> bool {
        matches!(self, Self::StrongSell | Self::Sell)
    }
}

/// Seven-level grade. Splits Hold into leaning bullish/bearish at ±0.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalGrade {
    StrongBuy,
    Buy,
    HoldBullish,
    Hold,
    HoldBearish,
    Sell,
    StrongSell,
}

impl SignalGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            Self::StrongBuy
        } else if score >= 2.0 {
            Self::Buy
        } else if score >= 0.5 {
            Self::HoldBullish
        } else if score <= -4.0 {
            Self::StrongSell
        } else if score <= -2.0 {
            Self::Sell
        } else if score <= -0.5 {
            Self::HoldBearish
        } else {
            Self::Hold
        }
    }

    pub fn action(self) -> SignalAction {
        match self {
            Self::StrongBuy => SignalAction::StrongBuy,
            Self::Buy => SignalAction::Buy,
            Self::HoldBullish | Self::Hold | Self::HoldBearish => SignalAction::Hold,
            Self::Sell => SignalAction::Sell,
            Self::StrongSell => SignalAction::StrongSell,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::HoldBullish => "HOLD (Bullish)",
            Self::Hold => "HOLD",
            Self::HoldBearish => "HOLD (Bearish)",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }
}

/// Which rule produced a sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Price vs SMA50/SMA200, ±3
    Trend,
    /// MACD crossover state, ±2
    Momentum,
    /// RSI extreme, ±0.5
    Rsi,
    /// Bollinger band breach, ±0.5
    Bands,
    /// Price vs filtered estimate, ±3
    FilterTrend,
    /// 20-sample change of the filtered estimate, ±2
    FilterMomentum,
    /// One-step forecast vs price, ±1
    Forecast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub kind: ComponentKind,
    pub label: String,
    pub score: f64,
}

impl ScoreComponent {
    pub fn new(kind: ComponentKind, label: impl Into<String>, score: f64) -> Self {
        Self {
            kind,
            label: label.into(),
            score,
        }
    }
}

/// Latest indicator values behind a scored result. Percentages are
/// `(price / sma − 1) × 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IndicatorSnapshot {
    pub price: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub price_vs_sma_fast: Option<f64>,
    pub price_vs_sma_slow: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub pivots: Option<PivotLevels>,
}

/// How a result was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalBasis {
    /// Indicator scoring: ordered sub-scores (trend, momentum, RSI, bands).
    Scored {
        components: Vec<ScoreComponent>,
        agreement_bonus: f64,
        snapshot: IndicatorSnapshot,
    },
    /// Fixed-income rule table.
    RuleTable {
        subclass: BondSubclass,
        recommendation: String,
        rationale: Vec<String>,
        observations: Vec<String>,
        return_lookback_pct: f64,
        price_vs_sma_slow: Option<f64>,
    },
}

/// Immutable result of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub instrument: String,
    pub class: InstrumentClass,
    /// In [−6, 6]; always 0 for the bond rule table.
    pub score: f64,
    pub action: SignalAction,
    pub grade: SignalGrade,
    /// In [0, 100].
    pub confidence: f64,
    pub basis: SignalBasis,
    pub warnings: Vec<String>,
}

impl SignalResult {
    /// Sum of sub-scores of the given kind (0 when absent).
    pub fn component(&self, kind: ComponentKind) -> f64 {
        match &self.basis {
            SignalBasis::Scored { components, .. } => components
                .iter()
                .filter(|c| c.kind == kind)
                .map(|c| c.score)
                .sum(),
            SignalBasis::RuleTable { .. } => 0.0,
        }
    }

    pub fn trend(&self) -> f64 {
        self.component(ComponentKind::Trend)
    }

    pub fn momentum(&self) -> f64 {
        self.component(ComponentKind::Momentum)
    }

    /// RSI and band terms combined, ±1.
    pub fn extremes(&self) -> f64 {
        self.component(ComponentKind::Rsi) + self.component(ComponentKind::Bands)
    }

    pub fn is_rule_table(&self) -> bool {
        matches!(self.basis, SignalBasis::RuleTable { .. })
    }
}

/// Indicator windows used by the scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub support_window: usize,
    /// Lookback of the bond rule table's trailing return.
    pub bond_return_lookback: usize,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_k: 2.0,
            sma_fast: 50,
            sma_slow: 200,
            support_window: 20,
            bond_return_lookback: 60,
        }
    }
}

/// Score an instrument. Bonds go to the rule table, everything else to the
/// indicator scorer.
pub fn score(series: &PriceSeries, instrument_id: &str, params: &SignalParams) -> SignalResult {
    let prices = series.prices();
    match InstrumentClass::classify(instrument_id) {
        InstrumentClass::Bond { subclass } => {
            bond::score(&prices, instrument_id, subclass, params)
        }
        InstrumentClass::Equity => primary::score(&prices, instrument_id, params),
    }
}

/// Drop trailing void prices so the "current" price is the latest reported
/// one. Returns the trimmed slice and how many points were dropped.
pub(crate) fn trim_trailing_void(prices: &[f64]) -> (&[f64], usize) {
    let end = prices
        .iter()
        .rposition(|p| !p.is_nan())
        .map_or(0, |i| i + 1);
    (&prices[..end], prices.len() - end)
}

/// `(a / b − 1) × 100` when both are defined.
pub(crate) fn pct_vs(a: f64, b: Option<f64>) -> Option<f64> {
    b.map(|b| (a / b - 1.0) * 100.0).filter(|v| v.is_finite())
}
