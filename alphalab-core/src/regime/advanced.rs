//! Current-regime assessment with sector-rotation confirmation and a VIX
//! override.

use serde::{Deserialize, Serialize};

use crate::indicators::{latest, Indicator, Sma};
use crate::stats::{self, PERIODS_PER_YEAR};

use super::sector::{RotationSignal, Sector, SectorRotation};
use super::Regime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedParams {
    pub lookback: usize,
    /// Daily mean return band around zero treated as sideways.
    pub daily_return_threshold: f64,
    /// Annualized volatility above which the regime is high-vol.
    pub high_volatility: f64,
    /// VIX level that marks a low realized-vol regime as high-vol.
    pub vix_threshold: f64,
    pub base_confidence: f64,
}

impl Default for AdvancedParams {
    fn default() -> Self {
        Self {
            lookback: 60,
            daily_return_threshold: 0.0005,
            high_volatility: 0.25,
            vix_threshold: 30.0,
            base_confidence: 0.7,
        }
    }
}

/// Rotation that contradicts the base regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeQualifier {
    /// Bull market led by defensive sectors.
    Weakening,
    /// Bear market led by growth or cyclical sectors.
    Bottoming,
}

impl RegimeQualifier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weakening => "(Weakening)",
            Self::Bottoming => "(Bottoming?)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendMetrics {
    /// Mean daily return over the lookback.
    pub recent_return: f64,
    /// Annualized volatility over the lookback.
    pub volatility: f64,
    /// Price above SMA50; `None` when undefined.
    pub short_term_up: Option<bool>,
    /// Price above SMA200; `None` when undefined.
    pub long_term_up: Option<bool>,
    /// SMA50 above SMA200.
    pub sma_cross_bullish: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeAssessment {
    pub regime: Regime,
    pub qualifier: Option<RegimeQualifier>,
    pub confidence: f64,
    pub transition_probability: f64,
    pub metrics: TrendMetrics,
    pub sector_signal: Option<RotationSignal>,
    pub leading_sector: Option<Sector>,
    pub warnings: Vec<String>,
}

impl RegimeAssessment {
    /// "Bull Market - Low Vol (Weakening)" style label.
    pub fn label(&self) -> String {
        match self.qualifier {
            Some(q) => format!("{} {}", self.regime.label(), q.label()),
            None => self.regime.label().to_string(),
        }
    }
}

/// Mean and sample std of the trailing `lookback` returns; NaN when any of
/// them is missing or the history is short.
fn trailing_stats(returns: &[f64], lookback: usize) -> (f64, f64) {
    if lookback < 2 || returns.len() < lookback {
        return (f64::NAN, f64::NAN);
    }
    let window = &returns[returns.len() - lookback..];
    if window.iter().any(|r| !r.is_finite()) {
        return (f64::NAN, f64::NAN);
    }
    (stats::mean(window), stats::std_dev(window))
}

fn above(a: f64, b: Option<f64>) -> Option<bool> {
    b.filter(|_| a.is_finite()).map(|b| a > b)
}

/// Classify the latest regime.
///
/// `vix` of zero or below is treated as absent.
pub fn classify_advanced(
    prices: &[f64],
    returns: &[f64],
    vix: Option<f64>,
    rotation: Option<&SectorRotation>,
    params: &AdvancedParams,
) -> RegimeAssessment {
    let mut warnings = Vec::new();

    let (recent_return, daily_vol) = trailing_stats(returns, params.lookback);
    let volatility = daily_vol * PERIODS_PER_YEAR.sqrt();
    if !recent_return.is_finite() {
        tracing::warn!(
            samples = returns.len(),
            lookback = params.lookback,
            "not enough returns for regime lookback"
        );
        warnings.push(format!(
            "Fewer than {} returns; regime defaults to sideways",
            params.lookback
        ));
    }

    let price = prices.last().copied().unwrap_or(f64::NAN);
    let sma50 = latest(&Sma::new(50).compute(prices));
    let sma200 = latest(&Sma::new(200).compute(prices));
    let metrics = TrendMetrics {
        recent_return,
        volatility,
        short_term_up: above(price, sma50),
        long_term_up: above(price, sma200),
        sma_cross_bullish: sma50.and_then(|s| above(s, sma200)),
    };

    let mut vol_high = volatility > params.high_volatility;
    let direction = if recent_return > params.daily_return_threshold {
        1
    } else if recent_return < -params.daily_return_threshold {
        -1
    } else {
        0
    };
    let mut regime = Regime::from_parts(direction, vol_high);

    let mut confidence = params.base_confidence;
    let mut qualifier = None;
    if let Some(rot) = rotation {
        let risk_on = rot.signal.is_risk_on();
        let defensive = rot.signal == RotationSignal::Defensive;
        if regime.is_bull() {
            if risk_on {
                confidence = 0.9;
            } else if defensive {
                confidence = 0.5;
                qualifier = Some(RegimeQualifier::Weakening);
            }
        } else if regime.is_bear() {
            if defensive {
                confidence = 0.9;
            } else if risk_on {
                confidence = 0.5;
                qualifier = Some(RegimeQualifier::Bottoming);
            }
        }
    }

    if let Some(level) = vix.filter(|v| *v > 0.0) {
        if level > params.vix_threshold && !vol_high {
            vol_high = true;
            regime = regime.with_high_vol();
            tracing::debug!(vix = level, "VIX override to high volatility");
        }
    }

    let transition_probability = if confidence < 0.6 {
        0.4
    } else if qualifier.is_some() {
        0.3
    } else {
        0.0
    };

    tracing::debug!(
        regime = regime.label(),
        vol_high,
        confidence,
        "advanced regime classified"
    );

    RegimeAssessment {
        regime,
        qualifier,
        confidence,
        transition_probability,
        metrics,
        sector_signal: rotation.map(|r| r.signal),
        leading_sector: rotation.map(|r| r.top_sector),
        warnings,
    }
}
