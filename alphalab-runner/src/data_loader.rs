//! CSV price loading.
//!
//! Files carry a header row with at least `date` and `close` columns
//! (other columns are ignored). Dates are ISO `YYYY-MM-DD`. An empty or
//! `NaN` close is kept as a missing observation; rows may appear in any
//! order but dates must be unique.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use alphalab_core::domain::{PricePoint, PriceSeries, SeriesError};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no price rows for '{symbol}'")]
    Empty { symbol: String },

    #[error("invalid series for '{symbol}': {source}")]
    Series {
        symbol: String,
        #[source]
        source: SeriesError,
    },

    #[error("cannot derive a symbol from {}", path.display())]
    NoSymbol { path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    close: Option<f64>,
}

/// Parse `date,close` rows from any reader.
pub fn read_prices<R: Read>(reader: R, symbol: &str) -> Result<PriceSeries, LoadError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut points = Vec::new();
    for row in csv.deserialize() {
        let row: PriceRow = row?;
        points.push(PricePoint::new(row.date, row.close.unwrap_or(f64::NAN)));
    }
    if points.is_empty() {
        return Err(LoadError::Empty {
            symbol: symbol.to_string(),
        });
    }
    points.sort_by_key(|p| p.date);

    let missing = points.iter().filter(|p| p.is_void()).count();
    if missing > 0 {
        tracing::warn!(symbol, missing, "price file has missing closes");
    }

    PriceSeries::new(symbol, points).map_err(|source| LoadError::Series {
        symbol: symbol.to_string(),
        source,
    })
}

/// Load one price file. The symbol defaults to the upper-cased file stem
/// (`data/spy.csv` → `SPY`).
pub fn load_price_csv(path: impl AsRef<Path>, symbol: Option<&str>) -> Result<PriceSeries, LoadError> {
    let path = path.as_ref();
    let symbol = match symbol {
        Some(s) => s.to_ascii_uppercase(),
        None => symbol_from_path(path)?,
    };
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = read_prices(file, &symbol)?;
    tracing::debug!(symbol = %symbol, rows = series.len(), path = %path.display(), "loaded prices");
    Ok(series)
}

/// Upper-cased file stem of `path`.
pub fn symbol_from_path(path: &Path) -> Result<String, LoadError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_uppercase())
        .ok_or_else(|| LoadError::NoSymbol {
            path: path.to_path_buf(),
        })
}
