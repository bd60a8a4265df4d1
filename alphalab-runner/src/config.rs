//! Analysis configuration loaded from TOML.
//!
//! Every section and field has a default, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! [signal]
//! rsi_period = 14
//!
//! [monte_carlo]
//! simulations = 5000
//! seed = 7
//!
//! [optimizer]
//! objective = "min_variance"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use alphalab_core::kalman::FilterParams;
use alphalab_core::regime::{AdvancedParams, RegimeParams};
use alphalab_core::signals::SignalParams;

use crate::frontier::FrontierParams;
use crate::metrics::MetricsParams;
use crate::monte_carlo::MonteCarloParams;
use crate::optimizer::OptimizerParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Parameters for every analysis the runner performs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub signal: SignalParams,
    pub filter: FilterParams,
    pub metrics: MetricsParams,
    pub regime: RegimeConfig,
    pub monte_carlo: MonteCarloParams,
    pub optimizer: OptimizerParams,
    pub frontier: FrontierParams,
}

/// Rolling and advanced regime classifier settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    pub rolling: RegimeParams,
    pub advanced: AdvancedParams,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.signal;
        for (field, value) in [
            ("signal.rsi_period", s.rsi_period),
            ("signal.macd_fast", s.macd_fast),
            ("signal.macd_slow", s.macd_slow),
            ("signal.macd_signal", s.macd_signal),
            ("signal.bollinger_period", s.bollinger_period),
            ("signal.sma_fast", s.sma_fast),
            ("signal.sma_slow", s.sma_slow),
            ("signal.support_window", s.support_window),
            ("signal.bond_return_lookback", s.bond_return_lookback),
            ("regime.rolling.lookback", self.regime.rolling.lookback),
            ("regime.advanced.lookback", self.regime.advanced.lookback),
            ("monte_carlo.simulations", self.monte_carlo.simulations),
            ("monte_carlo.horizon", self.monte_carlo.horizon),
            ("optimizer.max_iterations", self.optimizer.max_iterations),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be at least 1"));
            }
        }
        if s.macd_fast >= s.macd_slow {
            return Err(invalid("signal.macd_fast", "must be shorter than macd_slow"));
        }
        if s.sma_fast >= s.sma_slow {
            return Err(invalid("signal.sma_fast", "must be shorter than sma_slow"));
        }
        if !positive(s.bollinger_k) {
            return Err(invalid("signal.bollinger_k", "must be positive"));
        }

        let f = &self.filter;
        if !positive(f.observation_noise) {
            return Err(invalid("filter.observation_noise", "must be positive"));
        }
        if !(f.process_noise.is_finite() && f.process_noise >= 0.0) {
            return Err(invalid("filter.process_noise", "must be non-negative"));
        }
        if !positive(f.initial_variance) {
            return Err(invalid("filter.initial_variance", "must be positive"));
        }

        if !self.metrics.risk_free_rate.is_finite() {
            return Err(invalid("metrics.risk_free_rate", "must be finite"));
        }
        for (field, value) in [
            ("metrics.periods_per_year", self.metrics.periods_per_year),
            ("optimizer.periods_per_year", self.optimizer.periods_per_year),
            ("optimizer.tolerance", self.optimizer.tolerance),
        ] {
            if !positive(value) {
                return Err(invalid(field, "must be positive"));
            }
        }
        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
