//! Primary indicator scorer.
//!
//! Score = Trend (±3) + Momentum (±2) + Extremes (±1), clamped to [−6, 6].
//! Confidence = min(min(|score| × 15, 100) + bonus, 100) where the bonus is
//! 10 when every non-zero component points the same way.

use crate::domain::InstrumentClass;
use crate::indicators::{latest, Bollinger, Indicator, Macd, Rsi, Sma, SupportResistance};

use super::{
    pct_vs, trim_trailing_void, ComponentKind, IndicatorSnapshot, ScoreComponent, SignalBasis,
    SignalGrade, SignalParams, SignalResult, MAX_SCORE,
};

const AGREEMENT_BONUS: f64 = 10.0;
const CONFIDENCE_PER_POINT: f64 = 15.0;

/// Score an equity price history. The current price is the last reported
/// (non-void) price.
pub fn score(prices: &[f64], instrument_id: &str, params: &SignalParams) -> SignalResult {
    let mut warnings = Vec::new();
    let (prices, dropped) = trim_trailing_void(prices);
    if dropped > 0 {
        tracing::warn!(instrument = instrument_id, dropped, "trailing prices missing");
        warnings.push(format!("{dropped} trailing price(s) missing; scored at last reported price"));
    }

    let Some(&price) = prices.last() else {
        tracing::warn!(instrument = instrument_id, "no prices to score");
        warnings.push("No price history; signal is undefined".to_string());
        return empty_result(instrument_id, warnings);
    };

    if prices.len() < params.sma_slow {
        warnings.push(format!(
            "Insufficient history for trend: {} of {} samples",
            prices.len(),
            params.sma_slow
        ));
    }

    let sma_fast = Sma::new(params.sma_fast).latest(prices);
    let sma_slow = Sma::new(params.sma_slow).latest(prices);
    let rsi = Rsi::new(params.rsi_period).latest(prices);
    let macd = Macd::new(params.macd_fast, params.macd_slow, params.macd_signal).compute(prices);
    let bands = Bollinger::new(params.bollinger_period, params.bollinger_k).compute(prices);
    let upper = latest(&bands.upper);
    let lower = latest(&bands.lower);

    let trend = trend_component(price, sma_fast, sma_slow);
    let momentum = momentum_component(
        macd.latest_line(),
        macd.latest_signal(),
        macd.latest_histogram(),
        macd.previous_histogram(),
    );
    let rsi_term = rsi_component(rsi);
    let bands_term = bands_component(price, upper, lower);

    let extremes = rsi_term.score + bands_term.score;
    let total = (trend.score + momentum.score + extremes).clamp(-MAX_SCORE, MAX_SCORE);

    let bonus = agreement_bonus(&[trend.score, momentum.score, extremes]);
    let base = (total.abs() * CONFIDENCE_PER_POINT).min(100.0);
    let confidence = (base + bonus).min(100.0);

    let grade = SignalGrade::from_score(total);

    tracing::debug!(
        instrument = instrument_id,
        trend = trend.score,
        momentum = momentum.score,
        extremes,
        total,
        "primary score"
    );

    let snapshot = IndicatorSnapshot {
        price: Some(price),
        rsi,
        macd: macd.latest_line(),
        macd_signal: macd.latest_signal(),
        macd_histogram: macd.latest_histogram(),
        sma_fast,
        sma_slow,
        price_vs_sma_fast: pct_vs(price, sma_fast),
        price_vs_sma_slow: pct_vs(price, sma_slow),
        bollinger_upper: upper,
        bollinger_lower: lower,
        pivots: Some(SupportResistance::new(params.support_window).latest(prices)),
    };

    SignalResult {
        instrument: instrument_id.to_string(),
        class: InstrumentClass::Equity,
        score: total,
        action: grade.action(),
        grade,
        confidence,
        basis: SignalBasis::Scored {
            components: vec![trend, momentum, rsi_term, bands_term],
            agreement_bonus: bonus,
            snapshot,
        },
        warnings,
    }
}

fn empty_result(instrument_id: &str, warnings: Vec<String>) -> SignalResult {
    let grade = SignalGrade::Hold;
    SignalResult {
        instrument: instrument_id.to_string(),
        class: InstrumentClass::Equity,
        score: 0.0,
        action: grade.action(),
        grade,
        confidence: 0.0,
        basis: SignalBasis::Scored {
            components: vec![
                ScoreComponent::new(ComponentKind::Trend, "Insufficient data for trend", 0.0),
                ScoreComponent::new(ComponentKind::Momentum, "Insufficient data for MACD", 0.0),
                ScoreComponent::new(ComponentKind::Rsi, "RSI undefined", 0.0),
                ScoreComponent::new(ComponentKind::Bands, "Bollinger bands undefined", 0.0),
            ],
            agreement_bonus: 0.0,
            snapshot: IndicatorSnapshot::default(),
        },
        warnings,
    }
}

// ─── Components ─────────────────────────────────────────────────────

fn trend_component(price: f64, sma_fast: Option<f64>, sma_slow: Option<f64>) -> ScoreComponent {
    let (Some(fast), Some(slow)) = (sma_fast, sma_slow) else {
        return ScoreComponent::new(ComponentKind::Trend, "Insufficient data for trend", 0.0);
    };

    let above_fast = price > fast;
    let above_slow = price > slow;
    let fast_above_slow = fast > slow;

    let (label, score) = if above_fast && above_slow && fast_above_slow {
        ("Price > 50 SMA > 200 SMA (Strong Uptrend)", 3.0)
    } else if above_slow {
        ("Price above 200 SMA (Uptrend)", 2.0)
    } else if !above_fast && !above_slow && !fast_above_slow {
        ("Price < 50 SMA < 200 SMA (Strong Downtrend)", -3.0)
    } else if !above_slow {
        ("Price below 200 SMA (Downtrend)", -2.0)
    } else {
        ("Mixed trend signals", 0.0)
    };
    ScoreComponent::new(ComponentKind::Trend, label, score)
}

/// `line == signal` falls through to the bearish branch.
fn momentum_component(
    line: Option<f64>,
    signal: Option<f64>,
    histogram: Option<f64>,
    previous_histogram: Option<f64>,
) -> ScoreComponent {
    let (Some(line), Some(signal)) = (line, signal) else {
        return ScoreComponent::new(ComponentKind::Momentum, "Insufficient data for MACD", 0.0);
    };
    let hist = histogram.unwrap_or(line - signal);
    let prev = previous_histogram.unwrap_or(0.0);

    let (label, score) = if line > signal && prev < 0.0 && 0.0 < hist {
        ("MACD bullish crossover", 2.0)
    } else if line < signal && prev > 0.0 && 0.0 > hist {
        ("MACD bearish crossover", -2.0)
    } else if line > signal {
        ("MACD bullish", 1.0)
    } else {
        ("MACD bearish", -1.0)
    };
    ScoreComponent::new(ComponentKind::Momentum, label, score)
}

fn rsi_component(rsi: Option<f64>) -> ScoreComponent {
    let Some(rsi) = rsi else {
        return ScoreComponent::new(ComponentKind::Rsi, "RSI undefined", 0.0);
    };
    let (label, score) = if rsi < 30.0 {
        (format!("RSI oversold ({rsi:.1})"), 0.5)
    } else if rsi > 70.0 {
        (format!("RSI overbought ({rsi:.1})"), -0.5)
    } else if rsi < 40.0 {
        (format!("RSI bullish lean ({rsi:.1})"), 0.25)
    } else if rsi > 60.0 {
        (format!("RSI bearish lean ({rsi:.1})"), -0.25)
    } else {
        (format!("RSI neutral ({rsi:.1})"), 0.0)
    };
    ScoreComponent::new(ComponentKind::Rsi, label, score)
}

fn bands_component(price: f64, upper: Option<f64>, lower: Option<f64>) -> ScoreComponent {
    let (label, score) = match (upper, lower) {
        (_, Some(lower)) if price < lower => ("Price below lower Bollinger Band", 0.5),
        (Some(upper), _) if price > upper => ("Price above upper Bollinger Band", -0.5),
        (Some(_), Some(_)) => ("Price within Bollinger Bands", 0.0),
        _ => ("Bollinger bands undefined", 0.0),
    };
    ScoreComponent::new(ComponentKind::Bands, label, score)
}

/// 10 when all non-zero scores share a sign. All-zero counts as agreement.
fn agreement_bonus(scores: &[f64]) -> f64 {
    let nonzero = || scores.iter().filter(|s| **s != 0.0);
    if nonzero().all(|s| *s > 0.0) || nonzero().all(|s| *s < 0.0) {
        AGREEMENT_BONUS
    } else {
        0.0
    }
}
