//! Market regime classification.
//!
//! - [`rolling`]: per-date regimes from rolling return/volatility thresholds,
//!   plus performance by regime.
//! - [`advanced`]: current regime with sector-rotation confidence and VIX
//!   adjustment.
//! - [`sector`]: sector-basket relative strength vs SPY.
//! - [`outlook`]: momentum/volatility outlook with a target allocation.
//!
//! Classifications have no hysteresis: a regime can flip on a single sample
//! at a threshold boundary.

pub mod advanced;
pub mod outlook;
pub mod rolling;
pub mod sector;

use serde::{Deserialize, Serialize};

pub use advanced::{classify_advanced, AdvancedParams, RegimeAssessment, RegimeQualifier};
pub use outlook::{regime_outlook, MarketOutlook, OutlookRegime};
pub use rolling::{classify_regimes, regime_performance, RegimeParams, RegimePerformance, RegimeSeries};
pub use sector::{RotationSignal, Sector, SectorRotation};

/// The five base regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regime {
    BullLowVol,
    BullHighVol,
    Sideways,
    BearLowVol,
    BearHighVol,
}

impl Regime {
    /// Map a return direction and volatility level to a regime.
    /// `direction` is +1 for positive, −1 for negative, 0 for flat.
    pub fn from_parts(direction: i8, high_vol: bool) -> Self {
        match (direction.signum(), high_vol) {
            (1, false) => Self::BullLowVol,
            (1, true) => Self::BullHighVol,
            (-1, false) => Self::BearLowVol,
            (-1, true) => Self::BearHighVol,
            _ => Self::Sideways,
        }
    }

    pub fn is_bull(self) -> bool {
        matches!(self, Self::BullLowVol | Self::BullHighVol)
    }

    pub fn is_bear(self) -> bool {
        matches!(self, Self::BearLowVol | Self::BearHighVol)
    }

    pub fn is_high_vol(self) -> bool {
        matches!(self, Self::BullHighVol | Self::BearHighVol)
    }

    /// Same direction at high volatility. Sideways is unchanged.
    pub fn with_high_vol(self) -> Self {
        match self {
            Self::BullLowVol => Self::BullHighVol,
            Self::BearLowVol => Self::BearHighVol,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BullLowVol => "Bull Market - Low Vol",
            Self::BullHighVol => "Bull Market - High Vol",
            Self::Sideways => "Sideways Market",
            Self::BearLowVol => "Bear Market - Low Vol",
            Self::BearHighVol => "Bear Market - High Vol",
        }
    }

    /// Typical traits and allocation guidance for the regime.
    pub fn characteristics(self) -> RegimeCharacteristics {
        match self {
            Self::BullLowVol => RegimeCharacteristics {
                description: "Healthy bull market with steady gains",
                typical_duration: "12-36 months",
                best_sectors: &["Technology (XLK)", "Consumer Discretionary (XLY)", "Industrials (XLI)"],
                worst_sectors: &["Utilities (XLU)", "Consumer Staples (XLP)"],
                allocation: "Aggressive: 80-90% stocks, 10-20% bonds",
                risk: "Low to Moderate",
                warning_signs: &["Defensive sector outperformance", "Rising VIX", "Yield curve inversion"],
            },
            Self::BullHighVol => RegimeCharacteristics {
                description: "Choppy bull market with increased uncertainty",
                typical_duration: "6-18 months",
                best_sectors: &["Technology (XLK)", "Healthcare (XLV)", "Quality stocks"],
                worst_sectors: &["Highly leveraged sectors", "Speculative growth"],
                allocation: "Moderate: 60-70% stocks, 30-40% bonds",
                risk: "Moderate to High",
                warning_signs: &[
                    "Continued volatility increase",
                    "Sector rotation to defensives",
                    "Credit spread widening",
                ],
            },
            Self::Sideways => RegimeCharacteristics {
                description: "Range-bound market, unclear direction",
                typical_duration: "6-18 months",
                best_sectors: &["Mixed", "Tactical rotation"],
                worst_sectors: &["None specific"],
                allocation: "Balanced: 50-60% stocks, 40-50% bonds",
                risk: "Moderate",
                warning_signs: &["Breakout above/below range", "Clear sector rotation", "Volatility change"],
            },
            Self::BearLowVol => RegimeCharacteristics {
                description: "Grinding bear market, slow decline",
                typical_duration: "12-24 months",
                best_sectors: &["Healthcare (XLV)", "Consumer Staples (XLP)", "Dividend stocks"],
                worst_sectors: &["Cyclicals", "Growth stocks"],
                allocation: "Defensive: 40-50% stocks, 50-60% bonds",
                risk: "Moderate to High",
                warning_signs: &["Sector rotation to growth", "Volatility spike", "Bullish SMA cross"],
            },
            Self::BearHighVol => RegimeCharacteristics {
                description: "Crash or panic selling environment",
                typical_duration: "3-12 months",
                best_sectors: &["Consumer Staples (XLP)", "Utilities (XLU)", "Cash"],
                worst_sectors: &["All cyclicals", "High beta stocks"],
                allocation: "Defensive: 30-40% stocks, 60-70% bonds/cash",
                risk: "Very High",
                warning_signs: &["Capitulation volume", "Extreme oversold readings", "Policy response"],
            },
        }
    }
}

/// Static description of a regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegimeCharacteristics {
    pub description: &'static str,
    pub typical_duration: &'static str,
    pub best_sectors: &'static [&'static str],
    pub worst_sectors: &'static [&'static str],
    pub allocation: &'static str,
    pub risk: &'static str,
    pub warning_signs: &'static [&'static str],
}
