//! Secondary signal derived from the Kalman filter.
//!
//! Trend (±3): price vs filtered estimate.
//! Momentum (±2): 20-sample change of the filtered estimate.
//! Forecast (±1): one-step forecast vs price.

use serde::{Deserialize, Serialize};

use crate::kalman::FilterOutput;

use super::{ComponentKind, ScoreComponent, SignalAction};

/// Samples back used for the filtered-momentum term.
pub const FILTER_MOMENTUM_LOOKBACK: usize = 20;

const MIN_CONFIDENCE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSignal {
    pub score: f64,
    pub action: SignalAction,
    /// In [20, 100], narrower forecast intervals score higher.
    pub confidence: f64,
    pub components: Vec<ScoreComponent>,
    pub filtered_price: f64,
    pub forecast: f64,
    pub forecast_std: f64,
    /// History shorter than the filter's minimum.
    pub low_confidence: bool,
}

impl FilterSignal {
    /// `None` when the latest price or filtered estimate is undefined.
    pub fn from_output(price: f64, output: &FilterOutput) -> Option<Self> {
        let filtered = *output.smoothed.last()?;
        if !price.is_finite() || !filtered.is_finite() || price <= 0.0 {
            return None;
        }
        let forecast = output.state.one_step_forecast;
        let forecast_std = output.state.forecast_std();

        let trend = trend_component((price - filtered) / filtered * 100.0);
        let momentum = momentum_component(filtered_change(&output.smoothed));
        let prediction = forecast_component((forecast - price) / price * 100.0);

        let score = trend.score + momentum.score + prediction.score;
        let width = 2.0 * forecast_std;
        let confidence = (100.0 - width / price * 100.0 * 10.0).clamp(MIN_CONFIDENCE, 100.0);

        Some(Self {
            score,
            action: SignalAction::from_score(score),
            confidence,
            components: vec![trend, momentum, prediction],
            filtered_price: filtered,
            forecast,
            forecast_std,
            low_confidence: output.is_low_confidence(),
        })
    }

    pub fn component(&self, kind: ComponentKind) -> f64 {
        self.components
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.score)
            .sum()
    }
}

/// Percent change of the filtered estimate over the lookback, 0 when the
/// history is too short or the older value is undefined.
fn filtered_change(smoothed: &[f64]) -> f64 {
    let n = smoothed.len();
    if n < FILTER_MOMENTUM_LOOKBACK {
        return 0.0;
    }
    let then = smoothed[n - FILTER_MOMENTUM_LOOKBACK];
    let now = smoothed[n - 1];
    let change = (now - then) / then * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

fn trend_component(pct: f64) -> ScoreComponent {
    let (label, score) = if pct > 2.0 {
        ("Price significantly above Kalman trend", 3.0)
    } else if pct > 0.5 {
        ("Price above Kalman trend", 2.0)
    } else if pct < -2.0 {
        ("Price significantly below Kalman trend", -3.0)
    } else if pct < -0.5 {
        ("Price below Kalman trend", -2.0)
    } else {
        ("Price aligned with Kalman trend", 0.0)
    };
    ScoreComponent::new(ComponentKind::FilterTrend, label, score)
}

fn momentum_component(pct: f64) -> ScoreComponent {
    let (label, score) = if pct > 5.0 {
        ("Strong upward Kalman momentum", 2.0)
    } else if pct > 2.0 {
        ("Moderate upward momentum", 1.0)
    } else if pct < -5.0 {
        ("Strong downward Kalman momentum", -2.0)
    } else if pct < -2.0 {
        ("Moderate downward momentum", -1.0)
    } else {
        ("Neutral momentum", 0.0)
    };
    ScoreComponent::new(ComponentKind::FilterMomentum, label, score)
}

fn forecast_component(pct: f64) -> ScoreComponent {
    let (label, score) = if pct > 1.0 {
        ("Kalman predicts upward move", 1.0)
    } else if pct < -1.0 {
        ("Kalman predicts downward move", -1.0)
    } else {
        ("Kalman predicts sideways", 0.0)
    };
    ScoreComponent::new(ComponentKind::Forecast, label, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kalman::{filter_series, FilterParams};

    fn signal(prices: &[f64]) -> FilterSignal {
        let out = filter_series(prices, &FilterParams::default()).unwrap();
        FilterSignal::from_output(*prices.last().unwrap(), &out).unwrap()
    }

    #[test]
    fn steady_rally_is_bullish() {
        let prices: Vec<f64> = (0..150).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let s = signal(&prices);
        // Filter lags well behind a 1%/day trend
        assert_eq!(s.component(ComponentKind::FilterTrend), 3.0);
        assert_eq!(s.component(ComponentKind::FilterMomentum), 2.0);
        assert!(s.action.is_buy());
        assert!(!s.low_confidence);
    }

    #[test]
    fn flat_prices_are_neutral() {
        let s = signal(&[50.0; 120]);
        assert_eq!(s.score, 0.0);
        assert_eq!(s.action, SignalAction::Hold);
        // σ ≈ 0.31 on a price of 50 → 100 − 0.62 / 50 × 1000 ≈ 87.6
        assert!(s.confidence > 80.0 && s.confidence < 95.0);
    }

    #[test]
    fn confidence_floors_at_twenty() {
        // Forecast σ is ~0.31 regardless of price level; a price near 1
        // makes the interval relatively huge.
        let s = signal(&[1.0; 120]);
        assert_eq!(s.confidence, 20.0);
    }

    #[test]
    fn short_history_flags_low_confidence() {
        let s = signal(&[100.0, 101.0, 102.0]);
        assert!(s.low_confidence);
        assert_eq!(s.component(ComponentKind::FilterMomentum), 0.0);
    }

    #[test]
    fn thresholds() {
        assert_eq!(trend_component(2.5).score, 3.0);
        assert_eq!(trend_component(1.0).score, 2.0);
        assert_eq!(trend_component(0.0).score, 0.0);
        assert_eq!(trend_component(-1.0).score, -2.0);
        assert_eq!(trend_component(-2.5).score, -3.0);
        assert_eq!(momentum_component(3.0).score, 1.0);
        assert_eq!(momentum_component(-6.0).score, -2.0);
        assert_eq!(forecast_component(1.5).score, 1.0);
        assert_eq!(forecast_component(-0.5).score, 0.0);
    }
}
