//! One-dimensional Kalman filter over a price history.
//!
//! # Model
//!
//! ```text
//! x[t] = x[t-1] + w,  w ~ N(0, Q)   (random walk)
//! z[t] = x[t] + v,    v ~ N(0, R)   (identity observation)
//! ```
//!
//! A single forward pass, predict then update per sample; there is no
//! backward smoothing pass. The first step skips the transition: the
//! prediction is the initial state itself.
//!
//! The final one-step-ahead forecast runs one more predict + update against
//! the latest observation, so `one_step_forecast` is a filtered estimate
//! rather than a pure prior.

use serde::{Deserialize, Serialize};

/// Histories shorter than this still filter, but signals derived from the
/// output are flagged as low confidence.
pub const MIN_FILTER_HISTORY: usize = 100;

/// Floor for every variance the filter produces.
pub const VARIANCE_FLOOR: f64 = 1e-12;

/// Noise parameters. The initial state mean is always the first finite
/// observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub initial_variance: f64,
    /// R
    pub observation_noise: f64,
    /// Q
    pub process_noise: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            initial_variance: 1.0,
            observation_noise: 1.0,
            process_noise: 0.01,
        }
    }
}

/// Filter state after the final observation, plus the one-step forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub smoothed_estimate: f64,
    pub estimate_variance: f64,
    pub one_step_forecast: f64,
    pub forecast_variance: f64,
}

impl FilterState {
    pub fn forecast_std(&self) -> f64 {
        self.forecast_variance.sqrt()
    }
}

/// Full-history filter output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOutput {
    /// Filtered mean per input index; NaN before the first finite price.
    pub smoothed: Vec<f64>,
    pub variances: Vec<f64>,
    /// smoothed ± 2σ
    pub upper_band: Vec<f64>,
    pub lower_band: Vec<f64>,
    pub state: FilterState,
}

impl FilterOutput {
    pub fn len(&self) -> usize {
        self.smoothed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smoothed.is_empty()
    }

    pub fn is_low_confidence(&self) -> bool {
        self.len() < MIN_FILTER_HISTORY
    }
}

/// Incremental filter. Feeding a history through [`KalmanFilter::step`]
/// gives exactly the values [`filter_series`] reports.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    params: FilterParams,
    mean: f64,
    variance: f64,
    initialized: bool,
    last_observation: Option<f64>,
}

impl KalmanFilter {
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            mean: f64::NAN,
            variance: params.initial_variance.max(VARIANCE_FLOOR),
            initialized: false,
            last_observation: None,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Process one observation and return the filtered (mean, variance).
    ///
    /// A NaN observation only propagates the variance (predict without
    /// update). Before the first finite observation the mean stays NaN.
    pub fn step(&mut self, observation: f64) -> (f64, f64) {
        if !self.initialized {
            if observation.is_nan() {
                return (self.mean, self.variance);
            }
            // First finite sample: prior is the observation itself at the
            // initial variance; no transition.
            self.initialized = true;
            self.mean = observation;
            self.update(observation);
            self.last_observation = Some(observation);
            return (self.mean, self.variance);
        }

        self.predict();
        if !observation.is_nan() {
            self.update(observation);
            self.last_observation = Some(observation);
        }
        (self.mean, self.variance)
    }

    fn predict(&mut self) {
        self.variance = (self.variance + self.params.process_noise).max(VARIANCE_FLOOR);
    }

    fn update(&mut self, observation: f64) {
        let innovation = observation - self.mean;
        let s = self.variance + self.params.observation_noise;
        if s.abs() < f64::EPSILON {
            return;
        }
        let gain = self.variance / s;
        self.mean += gain * innovation;
        self.variance = ((1.0 - gain) * self.variance).max(VARIANCE_FLOOR);
    }

    /// Current state plus the forecast from re-filtering the latest
    /// observation. `None` until a finite observation has been seen.
    pub fn state(&self) -> Option<FilterState> {
        let last = self.last_observation?;
        let mut next = self.clone();
        next.predict();
        next.update(last);
        Some(FilterState {
            smoothed_estimate: self.mean,
            estimate_variance: self.variance,
            one_step_forecast: next.mean,
            forecast_variance: next.variance,
        })
    }
}

/// Filter a full price history.
///
/// Returns `None` when fewer than two finite observations are supplied.
pub fn filter_series(prices: &[f64], params: &FilterParams) -> Option<FilterOutput> {
    if prices.iter().filter(|p| p.is_finite()).count() < 2 {
        return None;
    }

    let mut filter = KalmanFilter::new(*params);
    let n = prices.len();
    let mut smoothed = Vec::with_capacity(n);
    let mut variances = Vec::with_capacity(n);

    for &p in prices {
        let (mean, variance) = filter.step(p);
        smoothed.push(mean);
        variances.push(variance);
    }

    let upper_band = smoothed
        .iter()
        .zip(&variances)
        .map(|(m, v)| m + 2.0 * v.sqrt())
        .collect();
    let lower_band = smoothed
        .iter()
        .zip(&variances)
        .map(|(m, v)| m - 2.0 * v.sqrt())
        .collect();

    let state = filter.state()?;

    Some(FilterOutput {
        smoothed,
        variances,
        upper_band,
        lower_band,
        state,
    })
}
