use serde::{Deserialize, Serialize};

/// Portfolio weights keyed by symbol, in a stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    entries: Vec<(String, f64)>,
}

impl WeightVector {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Equal weights `1/n` across `symbols`.
    pub fn equal<S: AsRef<str>>(symbols: &[S]) -> Self {
        let n = symbols.len();
        let w = if n == 0 { 0.0 } else { 1.0 / n as f64 };
        Self {
            entries: symbols.iter().map(|s| (s.as_ref().to_string(), w)).collect(),
        }
    }

    /// Pair `symbols` with raw `values` (same order).
    pub fn from_parts<S: AsRef<str>>(symbols: &[S], values: &[f64]) -> Self {
        Self {
            entries: symbols
                .iter()
                .zip(values)
                .map(|(s, &w)| (s.as_ref().to_string(), w))
                .collect(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, w)| *w)
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, w)| *w).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Long-only, each weight in [0, 1], summing to 1 within `tol`.
    pub fn is_fully_invested(&self, tol: f64) -> bool {
        self.entries
            .iter()
            .all(|(_, w)| *w >= -tol && *w <= 1.0 + tol)
            && (self.sum() - 1.0).abs() <= tol
    }
}
