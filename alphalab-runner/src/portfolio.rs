//! Multi-asset return panels and weighted portfolio returns.

use serde::{Deserialize, Serialize};

use alphalab_core::data::{align_returns, AlignedReturns};
use alphalab_core::domain::{PriceSeries, ReturnSeries, SeriesError, WeightVector};
use alphalab_core::stats;

/// Symbol used for the weighted portfolio return series.
pub const PORTFOLIO_SYMBOL: &str = "PORTFOLIO";

/// Periodic returns of several assets on their common dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReturns {
    aligned: AlignedReturns,
}

/// Annualized first and second moments of an [`AssetReturns`] panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub symbols: Vec<String>,
    /// Mean periodic return × periods per year.
    pub means: Vec<f64>,
    /// Sample covariance × periods per year, row-major.
    pub covariance: Vec<Vec<f64>>,
}

impl AssetReturns {
    /// Simple returns of each price series, inner-joined on dates where
    /// every asset has a finite return.
    pub fn from_prices(prices: &[PriceSeries]) -> Self {
        let returns: Vec<ReturnSeries> = prices.iter().map(PriceSeries::returns).collect();
        let refs: Vec<&ReturnSeries> = returns.iter().collect();
        Self::from_returns(&refs)
    }

    pub fn from_returns(returns: &[&ReturnSeries]) -> Self {
        let aligned = align_returns(returns);
        if !returns.is_empty() && aligned.is_empty() {
            tracing::warn!(assets = returns.len(), "assets share no common dates");
        }
        Self { aligned }
    }

    pub fn symbols(&self) -> &[String] {
        &self.aligned.symbols
    }

    pub fn aligned(&self) -> &AlignedReturns {
        &self.aligned
    }

    /// Number of assets.
    pub fn asset_count(&self) -> usize {
        self.aligned.symbols.len()
    }

    /// Number of common dates.
    pub fn observations(&self) -> usize {
        self.aligned.len()
    }

    pub fn moments(&self, periods_per_year: f64) -> Moments {
        let columns = &self.aligned.columns;
        let means = columns
            .iter()
            .map(|c| stats::mean(c) * periods_per_year)
            .collect();
        let covariance = columns
            .iter()
            .map(|a| {
                columns
                    .iter()
                    .map(|b| stats::covariance(a, b) * periods_per_year)
                    .collect()
            })
            .collect();
        Moments {
            symbols: self.aligned.symbols.clone(),
            means,
            covariance,
        }
    }

    /// Weighted sum of asset returns per common date. Symbols absent from
    /// `weights` contribute nothing.
    pub fn portfolio_returns(&self, weights: &WeightVector) -> Result<ReturnSeries, SeriesError> {
        let w: Vec<f64> = self
            .aligned
            .symbols
            .iter()
            .map(|s| weights.get(s).unwrap_or(0.0))
            .collect();
        let values = (0..self.aligned.len())
            .map(|i| {
                self.aligned
                    .columns
                    .iter()
                    .zip(&w)
                    .map(|(column, weight)| column[i] * weight)
                    .sum::<f64>()
            })
            .collect();
        ReturnSeries::new(PORTFOLIO_SYMBOL, self.aligned.dates.clone(), values)
    }
}

impl Moments {
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// `μ · w`.
    pub fn expected_return(&self, weights: &[f64]) -> f64 {
        self.means.iter().zip(weights).map(|(m, w)| m * w).sum()
    }

    /// `wᵀ Σ w`.
    pub fn variance(&self, weights: &[f64]) -> f64 {
        self.covariance
            .iter()
            .zip(weights)
            .map(|(row, wi)| wi * row.iter().zip(weights).map(|(c, wj)| c * wj).sum::<f64>())
            .sum()
    }

    /// `Σ w`.
    pub fn covariance_times(&self, weights: &[f64]) -> Vec<f64> {
        self.covariance
            .iter()
            .map(|row| row.iter().zip(weights).map(|(c, w)| c * w).sum::<f64>())
            .collect()
    }

    /// Annualized volatility of the weighted portfolio.
    pub fn volatility(&self, weights: &[f64]) -> f64 {
        self.variance(weights).max(0.0).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn prices(symbol: &str, values: &[f64]) -> PriceSeries {
        PriceSeries::from_prices(symbol, d(1), values).unwrap()
    }

    #[test]
    fn portfolio_is_weighted_sum() {
        let assets = AssetReturns::from_prices(&[
            prices("SPY", &[100.0, 110.0, 121.0]),
            prices("AGG", &[100.0, 100.0, 102.0]),
        ]);
        let weights = WeightVector::from_parts(&["SPY", "AGG"], &[0.6, 0.4]);

        let port = assets.portfolio_returns(&weights).unwrap();

        assert_eq!(port.symbol(), PORTFOLIO_SYMBOL);
        assert_eq!(port.len(), 2);
        assert!((port.values()[0] - 0.06).abs() < 1e-12);
        assert!((port.values()[1] - (0.06 + 0.008)).abs() < 1e-12);
    }

    #[test]
    fn missing_weight_counts_as_zero() {
        let assets = AssetReturns::from_prices(&[
            prices("SPY", &[100.0, 110.0]),
            prices("AGG", &[100.0, 101.0]),
        ]);
        let port = assets
            .portfolio_returns(&WeightVector::from_parts(&["SPY"], &[1.0]))
            .unwrap();
        assert!((port.values()[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn void_prices_drop_dates_for_every_asset() {
        let assets = AssetReturns::from_prices(&[
            prices("SPY", &[100.0, 101.0, f64::NAN, 103.0, 104.0]),
            prices("AGG", &[50.0, 50.5, 51.0, 51.5, 52.0]),
        ]);
        // Returns on days 2 and 5 survive; days 3 and 4 touch the gap.
        assert_eq!(assets.observations(), 2);
        assert_eq!(assets.asset_count(), 2);
    }

    #[test]
    fn moments_are_annualized() {
        let assets = AssetReturns::from_prices(&[
            prices("A", &[100.0, 101.0, 100.0, 101.0]),
            prices("B", &[100.0, 100.5, 101.0, 101.5]),
        ]);
        let m = assets.moments(252.0);
        let a = assets.aligned().column("A").unwrap();

        assert!((m.means[0] - stats::mean(a) * 252.0).abs() < 1e-12);
        assert!((m.covariance[0][0] - stats::std_dev(a).powi(2) * 252.0).abs() < 1e-12);
        assert_eq!(m.covariance[0][1], m.covariance[1][0]);
    }

    #[test]
    fn variance_matches_quadratic_form() {
        let m = Moments {
            symbols: vec!["A".into(), "B".into()],
            means: vec![0.1, 0.05],
            covariance: vec![vec![0.04, 0.01], vec![0.01, 0.09]],
        };
        let w = [0.5, 0.5];
        // 0.25·0.04 + 2·0.25·0.01 + 0.25·0.09
        assert!((m.variance(&w) - 0.0375).abs() < 1e-12);
        assert!((m.expected_return(&w) - 0.075).abs() < 1e-12);
        let sw = m.covariance_times(&w);
        assert!((sw[0] - 0.025).abs() < 1e-12);
        assert!((sw[1] - 0.05).abs() < 1e-12);
    }
}
