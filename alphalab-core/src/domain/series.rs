//! Price and return series: the fundamental market data units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One dated observation of an instrument's price.
///
/// `price` is NaN when the provider had no value for that date (void point).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// Returns true if the provider supplied no value for this date.
    pub fn is_void(&self) -> bool {
        self.price.is_nan()
    }
}

/// Errors raised while constructing a series.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("dates must be strictly increasing: {previous} is followed by {next}")]
    NonIncreasingDates { previous: NaiveDate, next: NaiveDate },

    #[error("price at {date} must be positive or NaN, got {price}")]
    InvalidPrice { date: NaiveDate, price: f64 },

    #[error("return series length mismatch: {dates} dates vs {values} values")]
    LengthMismatch { dates: usize, values: usize },
}

/// Ordered price history for a single instrument.
///
/// Dates are strictly increasing; prices are positive or NaN. Immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a validated series.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NonIncreasingDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        for point in &points {
            if !point.price.is_nan() && !(point.price > 0.0 && point.price.is_finite()) {
                return Err(SeriesError::InvalidPrice {
                    date: point.date,
                    price: point.price,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_prices(
        symbol: impl Into<String>,
        start: NaiveDate,
        prices: &[f64],
    ) -> Result<Self, SeriesError> {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(start + chrono::Duration::days(i as i64), price))
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw price values in date order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Latest non-void price.
    pub fn last_price(&self) -> Option<f64> {
        self.points
            .iter()
            .rev()
            .map(|p| p.price)
            .find(|p| !p.is_nan())
    }

    /// Simple returns `p[i] / p[i-1] - 1`, dated with the later observation.
    ///
    /// A return is NaN when either neighbouring price is void.
    pub fn returns(&self) -> ReturnSeries {
        let (dates, values) = self
            .points
            .windows(2)
            .map(|w| {
                let r = if w[0].is_void() || w[1].is_void() {
                    f64::NAN
                } else {
                    w[1].price / w[0].price - 1.0
                };
                (w[1].date, r)
            })
            .unzip();
        ReturnSeries {
            symbol: self.symbol.clone(),
            dates,
            values,
        }
    }
}

/// Dated simple returns derived from a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    pub fn new(
        symbol: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(SeriesError::NonIncreasingDates {
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            dates,
            values,
        })
    }

    /// Undated returns on consecutive calendar days from `start`.
    pub fn from_values(symbol: impl Into<String>, start: NaiveDate, values: Vec<f64>) -> Self {
        let dates = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        Self {
            symbol: symbol.into(),
            dates,
            values,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of the series with non-finite returns removed.
    pub fn finite(&self) -> ReturnSeries {
        let (dates, values) = self
            .dates
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| v.is_finite())
            .map(|(d, v)| (*d, *v))
            .unzip();
        ReturnSeries {
            symbol: self.symbol.clone(),
            dates,
            values,
        }
    }
}
