//! Domain types: price series, return series, instrument classes, weights.

pub mod instrument;
pub mod series;
pub mod weights;

pub use instrument::{BondSubclass, InstrumentClass, BOND_TICKERS};
pub use series::{PricePoint, PriceSeries, ReturnSeries, SeriesError};
pub use weights::WeightVector;
