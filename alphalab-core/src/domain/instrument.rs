use serde::{Deserialize, Serialize};

/// Tickers treated as bond funds. Anything else is scored as an equity.
pub const BOND_TICKERS: [&str; 16] = [
    "AGG", "BND", "TLT", "IEF", "SHY", "TIP", "LQD", "MUB", "HYG", "JNK", "VCIT", "VCSH", "BIV",
    "BSV", "VGIT", "VGSH",
];

/// Bond fund subclass, which selects the row of the bond rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondSubclass {
    /// AGG, BND, LQD
    CoreAggregate,
    /// TLT, IEF
    LongTreasury,
    /// HYG, JNK
    HighYield,
    /// SHY, VCSH
    ShortDuration,
    /// TIP
    InflationLinked,
    Other,
}

impl BondSubclass {
    pub fn of(ticker: &str) -> Self {
        match ticker {
            "AGG" | "BND" | "LQD" => Self::CoreAggregate,
            "TLT" | "IEF" => Self::LongTreasury,
            "HYG" | "JNK" => Self::HighYield,
            "SHY" | "VCSH" => Self::ShortDuration,
            "TIP" => Self::InflationLinked,
            _ => Self::Other,
        }
    }

    /// Human-readable subclass label used in signal text.
    pub fn label(self) -> &'static str {
        match self {
            Self::CoreAggregate => "Aggregate/Core",
            Self::LongTreasury => "Long-term Treasury",
            Self::HighYield => "High Yield Corporate",
            Self::ShortDuration => "Short-term",
            Self::InflationLinked => "Inflation-Protected",
            Self::Other => "Bond",
        }
    }
}

/// Instrument class, derived purely from the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentClass {
    Equity,
    Bond { subclass: BondSubclass },
}

impl InstrumentClass {
    /// Classify a ticker. Matching is case-insensitive.
    pub fn classify(ticker: &str) -> Self {
        let upper = ticker.trim().to_ascii_uppercase();
        if BOND_TICKERS.contains(&upper.as_str()) {
            Self::Bond {
                subclass: BondSubclass::of(&upper),
            }
        } else {
            Self::Equity
        }
    }

    pub fn is_bond(self) -> bool {
        matches!(self, Self::Bond { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bond_subclasses() {
        assert_eq!(
            InstrumentClass::classify("TLT"),
            InstrumentClass::Bond {
                subclass: BondSubclass::LongTreasury
            }
        );
        assert_eq!(
            InstrumentClass::classify("lqd"),
            InstrumentClass::Bond {
                subclass: BondSubclass::CoreAggregate
            }
        );
        assert_eq!(
            InstrumentClass::classify("VGIT"),
            InstrumentClass::Bond {
                subclass: BondSubclass::Other
            }
        );
    }

    #[test]
    fn unknown_ticker_is_equity() {
        assert_eq!(InstrumentClass::classify("AAPL"), InstrumentClass::Equity);
        assert!(!InstrumentClass::classify("SPY").is_bond());
    }

    #[test]
    fn every_bond_ticker_is_a_bond() {
        for t in BOND_TICKERS {
            assert!(InstrumentClass::classify(t).is_bond(), "{t}");
        }
    }
}
