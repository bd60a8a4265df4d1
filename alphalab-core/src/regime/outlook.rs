//! Momentum/volatility outlook with a target stock/bond/cash allocation.

use serde::{Deserialize, Serialize};

use crate::indicators::{latest, Indicator, Sma};
use crate::stats::{self, PERIODS_PER_YEAR};

const VOL_WINDOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutlookRegime {
    Crisis,
    Bear,
    Bull,
    Recovery,
    Neutral,
}

impl OutlookRegime {
    pub fn label(self) -> &'static str {
        match self {
            Self::Crisis => "High Volatility / Crisis",
            Self::Bear => "Bear Market",
            Self::Bull => "Bull Market",
            Self::Recovery => "Recovery",
            Self::Neutral => "Neutral / Consolidation",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::Crisis => "Reduce equity exposure to 40-50%. Increase cash and defensive positions. Avoid new positions until volatility subsides.",
            Self::Bear => "Reduce equity to 50-60%. Focus on quality, dividend-paying stocks. Consider defensive sectors.",
            Self::Bull => "Maintain 70-80% equity allocation. This is accumulation phase. Focus on growth and momentum.",
            Self::Recovery => "Gradually increase equity to 60-70%. Good time to add positions. Monitor for continued strength.",
            Self::Neutral => "Maintain balanced 60/40 portfolio. Wait for clearer directional signals before making changes.",
        }
    }

    pub fn allocation(self) -> Allocation {
        let (stocks, bonds, cash) = match self {
            Self::Crisis => (45, 45, 10),
            Self::Bear => (55, 40, 5),
            Self::Bull => (75, 22, 3),
            Self::Recovery => (65, 30, 5),
            Self::Neutral => (60, 35, 5),
        };
        Allocation { stocks, bonds, cash }
    }
}

/// Target allocation in whole percent; always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub stocks: u8,
    pub bonds: u8,
    pub cash: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

/// SMA50 vs SMA200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendState {
    Bullish,
    Bearish,
    Neutral,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutlook {
    pub regime: OutlookRegime,
    pub confidence: Confidence,
    pub allocation: Allocation,
    pub signals: Vec<String>,
    /// Annualized volatility of the trailing 60 returns.
    pub volatility: f64,
    /// 60-sample price change as a fraction.
    pub momentum_60d: f64,
    /// 20-sample price change in percent.
    pub return_20d_pct: f64,
    /// 60-sample price change in percent.
    pub return_60d_pct: f64,
    pub trend: TrendState,
    pub price_vs_sma200: Option<f64>,
}

impl MarketOutlook {
    pub fn action(&self) -> &'static str {
        self.regime.action()
    }
}

/// `(p[-1] / p[-n] − 1) × 100`, 0 when fewer than `n` prices.
fn trailing_pct(prices: &[f64], n: usize) -> f64 {
    let len = prices.len();
    if n == 0 || len < n {
        return 0.0;
    }
    let change = stats::pct_change(prices[len - n], prices[len - 1]);
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

pub fn regime_outlook(prices: &[f64], returns: &[f64]) -> MarketOutlook {
    let finite: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
    let tail = &finite[finite.len().saturating_sub(VOL_WINDOW)..];
    let volatility = stats::std_dev(tail) * PERIODS_PER_YEAR.sqrt();

    let return_20d_pct = trailing_pct(prices, 20);
    let return_60d_pct = trailing_pct(prices, 60);
    let momentum = return_60d_pct / 100.0;

    let sma50 = latest(&Sma::new(50).compute(prices));
    let sma200 = latest(&Sma::new(200).compute(prices));
    let price = prices.last().copied().unwrap_or(f64::NAN);
    let price_vs_sma200 = sma200
        .map(|s| stats::pct_change(s, price))
        .filter(|v| v.is_finite());

    let trend = match (sma50, sma200) {
        (Some(fast), Some(slow)) if prices.len() >= 200 => {
            if fast > slow {
                TrendState::Bullish
            } else if fast < slow {
                TrendState::Bearish
            } else {
                TrendState::Neutral
            }
        }
        _ => TrendState::InsufficientData,
    };

    let mut signals = Vec::new();
    let (regime, confidence) = if volatility > 0.35 {
        signals.push(format!("Volatility extremely high: {:.1}%", volatility * 100.0));
        (OutlookRegime::Crisis, Confidence::High)
    } else if momentum < -0.10 && volatility > 0.25 {
        signals.push(format!("Negative momentum: {:.1}%", momentum * 100.0));
        if trend == TrendState::Bearish {
            signals.push("Death Cross: 50-day below 200-day SMA".to_string());
        }
        let confidence = if momentum.abs() > 0.15 {
            Confidence::High
        } else {
            Confidence::Medium
        };
        (OutlookRegime::Bear, confidence)
    } else if momentum > 0.15 && volatility < 0.20 {
        signals.push(format!("Strong positive momentum: {:.1}%", momentum * 100.0));
        if trend == TrendState::Bullish {
            signals.push("Golden Cross: 50-day above 200-day SMA".to_string());
        }
        (OutlookRegime::Bull, Confidence::High)
    } else if momentum > 0.0 && return_20d_pct > 0.0 {
        signals.push(format!("Recovery in progress: {:.1}% momentum", momentum * 100.0));
        (OutlookRegime::Recovery, Confidence::Medium)
    } else {
        signals.push("Market lacking clear direction".to_string());
        (OutlookRegime::Neutral, Confidence::Medium)
    };

    MarketOutlook {
        regime,
        confidence,
        allocation: regime.allocation(),
        signals,
        volatility,
        momentum_60d: momentum,
        return_20d_pct,
        return_60d_pct,
        trend,
        price_vs_sma200,
    }
}
