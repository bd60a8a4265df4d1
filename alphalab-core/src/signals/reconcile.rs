//! Agreement between the primary and filter-based signals.

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::kalman::{filter_series, FilterParams};

use super::{score, FilterSignal, SignalAction, SignalParams, SignalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agreement {
    /// Both bullish or both bearish.
    Aligned,
    /// One bullish, the other bearish.
    Conflict,
    /// At least one side is neutral.
    Mixed,
}

impl Agreement {
    /// Primary leans bullish on Buy/StrongBuy or a Hold with a positive
    /// score; the filter signal only on Buy/StrongBuy.
    pub fn classify(primary: &SignalResult, secondary: &FilterSignal) -> Self {
        let primary_bull = primary.action.is_buy()
            || (primary.action == SignalAction::Hold && primary.score > 0.0);
        let primary_bear = primary.action.is_sell()
            || (primary.action == SignalAction::Hold && primary.score < 0.0);
        let secondary_bull = secondary.action.is_buy();
        let secondary_bear = secondary.action.is_sell();

        if (primary_bull && secondary_bull) || (primary_bear && secondary_bear) {
            Self::Aligned
        } else if (primary_bull && secondary_bear) || (primary_bear && secondary_bull) {
            Self::Conflict
        } else {
            Self::Mixed
        }
    }

    pub fn is_conflict(self) -> bool {
        self == Self::Conflict
    }
}

/// Primary result plus, for equities, the filter signal and agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub primary: SignalResult,
    pub secondary: Option<FilterSignal>,
    pub agreement: Option<Agreement>,
}

/// Score an instrument with both scorers and reconcile them.
///
/// Bond funds are rule-table only and carry no secondary signal.
pub fn analyze(
    series: &PriceSeries,
    instrument_id: &str,
    params: &SignalParams,
    filter_params: &FilterParams,
) -> SignalReport {
    let primary = score(series, instrument_id, params);
    if primary.is_rule_table() {
        return SignalReport {
            primary,
            secondary: None,
            agreement: None,
        };
    }

    let prices = series.prices();
    let secondary = series.last_price().and_then(|price| {
        let output = filter_series(&prices, filter_params)?;
        FilterSignal::from_output(price, &output)
    });

    if let Some(s) = &secondary {
        if s.low_confidence {
            tracing::debug!(
                instrument = instrument_id,
                samples = prices.len(),
                "filter signal computed on short history"
            );
        }
    }

    let agreement = secondary
        .as_ref()
        .map(|s| Agreement::classify(&primary, s));

    SignalReport {
        primary,
        secondary,
        agreement,
    }
}
