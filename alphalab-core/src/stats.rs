//! Statistical primitives shared by the scorers, regime classifiers and the
//! runner's risk engines.
//!
//! Conventions: standard deviation and covariance are sample estimates
//! (n − 1); degenerate inputs return 0.0 instead of NaN.

/// Trading periods per year used for annualization.
pub const PERIODS_PER_YEAR: f64 = 252.0;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation. Returns 0.0 for fewer than two values and
/// exactly 0.0 when every value is equal.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 || values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Denominators at or below this fraction of the numerator's magnitude
/// (floored at 1) are rounding noise and count as zero.
pub const RATIO_TOLERANCE: f64 = 1e-12;

/// `numerator / denominator`, or 0.0 when the denominator is zero up to
/// rounding noise or is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if !denominator.is_finite() || denominator.abs() <= RATIO_TOLERANCE * numerator.abs().max(1.0) {
        0.0
    } else {
        numerator / denominator
    }
}

/// Sample covariance of two equal-length slices. Returns 0.0 when the
/// lengths differ or fewer than two pairs are available.
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let ma = mean(a);
    let mb = mean(b);
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / (a.len() - 1) as f64
}

/// Percentile of an already-sorted slice using linear interpolation
/// between closest ranks. `p` is in [0, 100].
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// Quantile `q` in [0, 1] of unsorted values (NaNs ignored).
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, q * 100.0)
}

/// Median of values (NaNs ignored), or `None` when nothing remains.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    Some(percentile_sorted(&sorted, 50.0))
}

/// Rolling sample statistic over a trailing window. Positions before the
/// window fills, or whose window contains a NaN, are NaN.
pub fn rolling<F>(values: &[f64], window: usize, stat: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = stat(slice);
    }
    result
}

/// Percentage change between two values, `(to / from − 1) × 100`.
pub fn pct_change(from: f64, to: f64) -> f64 {
    (to / from - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_dev_is_sample_estimate() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sum of squared deviations from mean 5 is 32; 32 / 7.
        assert!((std_dev(&v) - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(std_dev(&[1.0]), 0.0);
    }

    #[test]
    fn constant_values_have_exact_zero_std() {
        assert_eq!(std_dev(&[0.001; 50]), 0.0);
        assert_eq!(std_dev(&[0.01; 7]), 0.0);
        assert!(std_dev(&[0.001, 0.001, f64::NAN]).is_nan());
    }

    #[test]
    fn safe_ratio_treats_rounding_noise_as_zero() {
        assert_eq!(safe_ratio(0.05, 1.1e-17), 0.0);
        assert_eq!(safe_ratio(1e6, 1e-7), 0.0);
        assert_eq!(safe_ratio(0.3, 0.0), 0.0);
        assert_eq!(safe_ratio(0.3, f64::NAN), 0.0);
        assert_eq!(safe_ratio(0.3, f64::INFINITY), 0.0);
        assert!((safe_ratio(0.3, 0.15) - 2.0).abs() < 1e-12);
        assert!((safe_ratio(-0.02, 0.2) + 0.1).abs() < 1e-12);
    }

    #[test]
    fn covariance_of_series_with_itself_is_variance() {
        let v = [0.01, -0.02, 0.03, 0.0];
        assert!((covariance(&v, &v) - std_dev(&v).powi(2)).abs() < 1e-15);
        assert_eq!(covariance(&v, &v[..2]), 0.0);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let v = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert!((quantile(&v, 0.5) - 3.0).abs() < 1e-12);
        assert!((quantile(&v, 0.05) - 1.2).abs() < 1e-12);
        assert!((quantile(&v, 1.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn median_ignores_nan() {
        assert_eq!(median(&[f64::NAN, 1.0, 3.0]), Some(2.0));
        assert_eq!(median(&[f64::NAN]), None);
    }

    #[test]
    fn rolling_mean_warms_up() {
        let r = rolling(&[1.0, 2.0, 3.0, 4.0], 2, mean);
        assert!(r[0].is_nan());
        assert_eq!(&r[1..], &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn rolling_shorter_than_window_is_undefined() {
        let r = rolling(&[1.0, 2.0], 3, mean);
        assert!(r.iter().all(|v| v.is_nan()));
    }
}
