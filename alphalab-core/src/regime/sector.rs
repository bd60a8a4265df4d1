//! Sector rotation: relative strength of SPDR sector funds vs SPY.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stats;

/// The eleven SPDR select sector funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Healthcare,
    Financials,
    Energy,
    Industrials,
    ConsumerStaples,
    ConsumerDiscretionary,
    Utilities,
    RealEstate,
    CommunicationServices,
    Materials,
}

impl Sector {
    pub const ALL: [Sector; 11] = [
        Sector::Technology,
        Sector::Healthcare,
        Sector::Financials,
        Sector::Energy,
        Sector::Industrials,
        Sector::ConsumerStaples,
        Sector::ConsumerDiscretionary,
        Sector::Utilities,
        Sector::RealEstate,
        Sector::CommunicationServices,
        Sector::Materials,
    ];

    pub const DEFENSIVE: [Sector; 3] = [
        Sector::ConsumerStaples,
        Sector::Utilities,
        Sector::Healthcare,
    ];

    pub const CYCLICAL: [Sector; 5] = [
        Sector::ConsumerDiscretionary,
        Sector::Industrials,
        Sector::Financials,
        Sector::Energy,
        Sector::Materials,
    ];

    /// Discretionary sits in both the cyclical and growth baskets.
    pub const GROWTH: [Sector; 3] = [
        Sector::Technology,
        Sector::CommunicationServices,
        Sector::ConsumerDiscretionary,
    ];

    pub fn ticker(self) -> &'static str {
        match self {
            Self::Technology => "XLK",
            Self::Healthcare => "XLV",
            Self::Financials => "XLF",
            Self::Energy => "XLE",
            Self::Industrials => "XLI",
            Self::ConsumerStaples => "XLP",
            Self::ConsumerDiscretionary => "XLY",
            Self::Utilities => "XLU",
            Self::RealEstate => "XLRE",
            Self::CommunicationServices => "XLC",
            Self::Materials => "XLB",
        }
    }

    pub fn from_ticker(ticker: &str) -> Option<Self> {
        let upper = ticker.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|s| s.ticker() == upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RotationSignal {
    Defensive,
    Cyclical,
    Growth,
    Mixed,
}

impl RotationSignal {
    pub fn is_risk_on(self) -> bool {
        matches!(self, Self::Growth | Self::Cyclical)
    }
}

/// Relative strength summary over a lookback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRotation {
    pub signal: RotationSignal,
    /// Basket relative strength behind the signal; 0 for Mixed.
    pub strength: f64,
    pub defensive: Option<f64>,
    pub cyclical: Option<f64>,
    pub growth: Option<f64>,
    /// Sector return minus SPY return over the lookback.
    pub relative_strength: BTreeMap<Sector, f64>,
    pub top_sector: Sector,
    pub bottom_sector: Sector,
}

/// `p[-1] / p[-1-lookback] − 1`, if defined.
fn lookback_return(prices: &[f64], lookback: usize) -> Option<f64> {
    let n = prices.len();
    if lookback == 0 || n <= lookback {
        return None;
    }
    Some(prices[n - 1] / prices[n - 1 - lookback] - 1.0).filter(|r| r.is_finite())
}

fn basket_mean(rs: &BTreeMap<Sector, f64>, basket: &[Sector]) -> Option<f64> {
    let members: Vec<f64> = basket.iter().filter_map(|s| rs.get(s).copied()).collect();
    if members.is_empty() {
        None
    } else {
        Some(stats::mean(&members))
    }
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

impl SectorRotation {
    /// Compare each sector's lookback return with SPY's.
    ///
    /// Each series uses its own latest value. Sectors without enough history
    /// are left out; `None` when SPY or every sector is too short.
    pub fn compute(
        sector_prices: &BTreeMap<Sector, Vec<f64>>,
        spy_prices: &[f64],
        lookback: usize,
    ) -> Option<Self> {
        let spy_return = lookback_return(spy_prices, lookback)?;

        let relative_strength: BTreeMap<Sector, f64> = sector_prices
            .iter()
            .filter_map(|(sector, prices)| {
                lookback_return(prices, lookback).map(|r| (*sector, r - spy_return))
            })
            .collect();
        if relative_strength.is_empty() {
            tracing::warn!(lookback, "no sector has enough history for rotation");
            return None;
        }

        let defensive = basket_mean(&relative_strength, &Sector::DEFENSIVE);
        let cyclical = basket_mean(&relative_strength, &Sector::CYCLICAL);
        let growth = basket_mean(&relative_strength, &Sector::GROWTH);

        let (signal, strength) = if gt(defensive, cyclical) && gt(defensive, growth) {
            (RotationSignal::Defensive, defensive.unwrap_or(0.0))
        } else if gt(cyclical, defensive) && gt(cyclical, growth) {
            (RotationSignal::Cyclical, cyclical.unwrap_or(0.0))
        } else if gt(growth, Some(0.0)) {
            (RotationSignal::Growth, growth.unwrap_or(0.0))
        } else {
            (RotationSignal::Mixed, 0.0)
        };

        let by_value = |a: &(&Sector, &f64), b: &(&Sector, &f64)| a.1.total_cmp(b.1);
        let (top_sector, _) = relative_strength.iter().max_by(by_value)?;
        let (bottom_sector, _) = relative_strength.iter().min_by(by_value)?;

        Some(Self {
            signal,
            strength,
            defensive,
            cyclical,
            growth,
            top_sector: *top_sector,
            bottom_sector: *bottom_sector,
            relative_strength,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 61 prices ending `pct` percent above the first.
    fn path(pct: f64) -> Vec<f64> {
        (0..=60).map(|i| 100.0 * (1.0 + pct / 100.0 * i as f64 / 60.0)).collect()
    }

    fn universe(overrides: &[(Sector, f64)]) -> BTreeMap<Sector, Vec<f64>> {
        Sector::ALL
            .into_iter()
            .map(|s| {
                let pct = overrides
                    .iter()
                    .find(|(o, _)| *o == s)
                    .map_or(5.0, |(_, p)| *p);
                (s, path(pct))
            })
            .collect()
    }

    #[test]
    fn defensive_leadership() {
        let prices = universe(&[
            (Sector::ConsumerStaples, 12.0),
            (Sector::Utilities, 12.0),
            (Sector::Healthcare, 12.0),
        ]);
        let rot = SectorRotation::compute(&prices, &path(5.0), 60).unwrap();
        assert_eq!(rot.signal, RotationSignal::Defensive);
        assert!((rot.strength - 0.07).abs() < 1e-9);
        assert!(Sector::DEFENSIVE.contains(&rot.top_sector));
    }

    #[test]
    fn cyclical_leadership() {
        let prices = universe(&[
            (Sector::Industrials, 15.0),
            (Sector::Financials, 15.0),
            (Sector::Energy, 15.0),
            (Sector::Materials, 15.0),
        ]);
        let rot = SectorRotation::compute(&prices, &path(5.0), 60).unwrap();
        assert_eq!(rot.signal, RotationSignal::Cyclical);
        assert_eq!(rot.bottom_sector, Sector::Technology);
    }

    #[test]
    fn growth_when_baskets_tie_but_positive() {
        // Discretionary in both cyclical and growth; tech/comm lift growth
        let prices = universe(&[
            (Sector::Technology, 20.0),
            (Sector::CommunicationServices, 20.0),
        ]);
        let rot = SectorRotation::compute(&prices, &path(5.0), 60).unwrap();
        assert_eq!(rot.signal, RotationSignal::Growth);
        assert!(rot.signal.is_risk_on());
    }

    #[test]
    fn flat_market_is_mixed() {
        let prices = universe(&[]);
        let rot = SectorRotation::compute(&prices, &path(5.0), 60).unwrap();
        assert_eq!(rot.signal, RotationSignal::Mixed);
        assert_eq!(rot.strength, 0.0);
    }

    #[test]
    fn short_spy_history_is_none() {
        let prices = universe(&[]);
        assert!(SectorRotation::compute(&prices, &[100.0; 30], 60).is_none());
    }

    #[test]
    fn ticker_round_trip() {
        for s in Sector::ALL {
            assert_eq!(Sector::from_ticker(s.ticker()), Some(s));
        }
        assert_eq!(Sector::from_ticker("xlre"), Some(Sector::RealEstate));
        assert_eq!(Sector::from_ticker("SPY"), None);
    }
}
