//! Multi-series date alignment.
//!
//! Series from different providers rarely share every date. Alignment is an
//! inner join: only dates present in every series with a finite value are
//! kept. Nothing is forward-filled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::ReturnSeries;

/// Return series aligned to a common date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedReturns {
    /// Common dates, ascending.
    pub dates: Vec<NaiveDate>,
    /// Symbols in input order.
    pub symbols: Vec<String>,
    /// One column per symbol, each the same length as `dates`.
    pub columns: Vec<Vec<f64>>,
}

impl AlignedReturns {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    /// Values of every column on row `i`.
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[i]).collect()
    }
}

/// Inner-join return series on dates with finite values in every series.
pub fn align_returns(series: &[&ReturnSeries]) -> AlignedReturns {
    let lookups: Vec<BTreeMap<NaiveDate, f64>> = series
        .iter()
        .map(|s| {
            s.dates()
                .iter()
                .zip(s.values())
                .filter(|(_, v)| v.is_finite())
                .map(|(d, v)| (*d, *v))
                .collect()
        })
        .collect();

    let mut common: BTreeSet<NaiveDate> = match lookups.first() {
        Some(first) => first.keys().copied().collect(),
        None => BTreeSet::new(),
    };
    for lookup in lookups.iter().skip(1) {
        common.retain(|d| lookup.contains_key(d));
    }
    let dates: Vec<NaiveDate> = common.into_iter().collect();

    let columns = lookups
        .iter()
        .map(|lookup| {
            dates
                .iter()
                .filter_map(|d| lookup.get(d).copied())
                .collect()
        })
        .collect();

    AlignedReturns {
        dates,
        symbols: series.iter().map(|s| s.symbol().to_string()).collect(),
        columns,
    }
}

/// Align two series, returning `(dates, left, right)`.
pub fn align_pair(
    left: &ReturnSeries,
    right: &ReturnSeries,
) -> (Vec<NaiveDate>, Vec<f64>, Vec<f64>) {
    let mut aligned = align_returns(&[left, right]);
    let right_values = aligned.columns.pop().unwrap_or_default();
    let left_values = aligned.columns.pop().unwrap_or_default();
    (aligned.dates, left_values, right_values)
}
