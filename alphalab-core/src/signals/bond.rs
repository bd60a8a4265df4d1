//! Fixed-income rule table.
//!
//! Bond funds bypass indicator scoring. Each subclass maps the trailing
//! return and the long-SMA trend to a fixed action and confidence.

use crate::domain::{BondSubclass, InstrumentClass};
use crate::indicators::{Indicator, Sma};

use super::{
    pct_vs, trim_trailing_void, SignalAction, SignalBasis, SignalGrade, SignalParams,
    SignalResult,
};

/// One row outcome of the rule table.
#[derive(Debug, Clone, PartialEq)]
struct Rule {
    action: SignalAction,
    confidence: f64,
    recommendation: &'static str,
    rationale: &'static [&'static str],
}

impl Rule {
    const fn new(
        action: SignalAction,
        confidence: f64,
        recommendation: &'static str,
        rationale: &'static [&'static str],
    ) -> Self {
        Self {
            action,
            confidence,
            recommendation,
            rationale,
        }
    }
}

/// Score a bond fund. `score` is always 0.
pub fn score(
    prices: &[f64],
    instrument_id: &str,
    subclass: BondSubclass,
    params: &SignalParams,
) -> SignalResult {
    let mut warnings = Vec::new();
    let (prices, dropped) = trim_trailing_void(prices);
    if dropped > 0 {
        warnings.push(format!("{dropped} trailing price(s) missing; scored at last reported price"));
    }

    let price = prices.last().copied();
    let sma_slow = Sma::new(params.sma_slow).latest(prices);
    let lookback_return = trailing_return(prices, params.bond_return_lookback);
    if prices.len() < params.bond_return_lookback {
        warnings.push(format!(
            "Insufficient history for {}-sample return: {} samples",
            params.bond_return_lookback,
            prices.len()
        ));
    }
    if price.is_none() {
        tracing::warn!(instrument = instrument_id, "no prices for bond rule table");
        warnings.push("No price history; rule table applied without price data".to_string());
    }

    // None when the trend is undefined
    let trend_up = match (price, sma_slow) {
        (Some(p), Some(s)) => Some(p > s),
        _ => None,
    };

    let rule = evaluate(subclass, trend_up, lookback_return);

    let ticker = instrument_id.trim().to_ascii_uppercase();
    let mut observations = vec![format!("{} - {}", subclass.label(), ticker)];
    match trend_up {
        Some(true) => observations.push("Price above 200-day average".to_string()),
        Some(false) => observations.push("Price below 200-day average".to_string()),
        None => {}
    }
    if lookback_return.abs() < 2.0 {
        observations.push("Flat recent performance".to_string());
    } else {
        let direction = if lookback_return > 0.0 { "Up" } else { "Down" };
        observations.push(format!(
            "{direction} {:.1}% over {} days",
            lookback_return.abs(),
            params.bond_return_lookback
        ));
    }

    let grade = match rule.action {
        SignalAction::Buy | SignalAction::StrongBuy => SignalGrade::Buy,
        SignalAction::Sell | SignalAction::StrongSell => SignalGrade::Sell,
        SignalAction::Hold => SignalGrade::Hold,
    };

    SignalResult {
        instrument: instrument_id.to_string(),
        class: InstrumentClass::Bond { subclass },
        score: 0.0,
        action: rule.action,
        grade,
        confidence: rule.confidence,
        basis: SignalBasis::RuleTable {
            subclass,
            recommendation: rule.recommendation.to_string(),
            rationale: rule.rationale.iter().map(|s| s.to_string()).collect(),
            observations,
            return_lookback_pct: lookback_return,
            price_vs_sma_slow: price.and_then(|p| pct_vs(p, sma_slow)),
        },
        warnings,
    }
}

/// `(p[-1] / p[-lookback] − 1) × 100`, or 0 with fewer than `lookback`
/// samples.
fn trailing_return(prices: &[f64], lookback: usize) -> f64 {
    let n = prices.len();
    if lookback == 0 || n < lookback {
        return 0.0;
    }
    let r = (prices[n - 1] / prices[n - lookback] - 1.0) * 100.0;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

fn evaluate(subclass: BondSubclass, trend_up: Option<bool>, ret: f64) -> Rule {
    use SignalAction::{Buy, Hold, Sell};

    // An undefined trend is "not up" for the sell branches.
    let up = trend_up == Some(true);

    match subclass {
        BondSubclass::CoreAggregate => Rule::new(
            Hold,
            95.0,
            "Hold for portfolio stability. Not a trading position - this is permanent ballast.",
            &[
                "Core bonds are 20-40% of balanced portfolio",
                "Provides stability when stocks decline",
                "Rebalance only when allocation drifts significantly",
                "Never trade - permanent diversification holding",
            ],
        ),
        BondSubclass::LongTreasury => {
            if up && ret > 3.0 {
                Rule::new(
                    Buy,
                    75.0,
                    "Interest rates falling - bond prices rising. Tactical buy.",
                    &[
                        "Rates declining benefits long-duration bonds",
                        "Use 10-15% allocation as rate hedge",
                        "Monitor Fed policy for reversal",
                    ],
                )
            } else if up && ret > 0.0 {
                Rule::new(
                    Hold,
                    65.0,
                    "Uptrend intact. Hold current position.",
                    &["Positive trend but watch Fed policy", "Good rate hedge"],
                )
            } else if !up && ret < -3.0 {
                Rule::new(
                    Sell,
                    75.0,
                    "Interest rates rising - bond prices falling. Reduce exposure.",
                    &[
                        "Rising rates hurt long-duration bonds",
                        "Consider shorter-duration alternatives",
                    ],
                )
            } else {
                Rule::new(
                    Hold,
                    50.0,
                    "Mixed signals. Hold or wait for clarity.",
                    &["Unclear rate direction"],
                )
            }
        }
        BondSubclass::HighYield => {
            if up && ret > 5.0 {
                Rule::new(
                    Buy,
                    70.0,
                    "High yield strong - credit spreads tight. Risk-on.",
                    &[
                        "Strong economy = tight credit spreads",
                        "Limit to 5-10% allocation (still risky)",
                    ],
                )
            } else if !up && ret < -3.0 {
                Rule::new(
                    Sell,
                    80.0,
                    "High yield weakness - recession risk. Exit.",
                    &[
                        "Widening credit spreads signal recession",
                        "High yield crashes in downturns (-20% to -30%)",
                        "Switch to quality bonds (AGG/TLT)",
                    ],
                )
            } else {
                Rule::new(
                    Hold,
                    55.0,
                    "Monitor for clear trend.",
                    &["High yield is volatile - wait for clarity"],
                )
            }
        }
        BondSubclass::ShortDuration => Rule::new(
            Hold,
            85.0,
            "Short-term bonds as cash alternative. Minimal rate risk.",
            &[
                "Short duration = minimal volatility",
                "Use for cash allocation",
                "Good when rates rising",
            ],
        ),
        BondSubclass::InflationLinked => {
            if ret > 3.0 {
                Rule::new(
                    Buy,
                    65.0,
                    "Inflation expectations rising. TIPS provide protection.",
                    &["Principal adjusts with CPI", "Use 10-15% in inflationary periods"],
                )
            } else {
                Rule::new(
                    Hold,
                    75.0,
                    "Hold for inflation protection.",
                    &["Real yield protection", "Hedge for inflation uncertainty"],
                )
            }
        }
        BondSubclass::Other => Rule::new(
            Hold,
            70.0,
            "Hold for bond allocation.",
            &["Bond allocation for diversification"],
        ),
    }
}
