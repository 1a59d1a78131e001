//! Velocity estimator configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on `calibration_samples` (100 s of stillness at 100 Hz)
pub const MAX_CALIBRATION_SAMPLES: usize = 10_000;

/// Tuning for [`super::VelocityEstimator`].
///
/// Deserialized from the `[estimator]` TOML section; every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Stationary samples averaged into the gravity offset (default: 3)
    #[serde(default = "default_calibration_samples")]
    pub calibration_samples: usize,

    /// Per-tick multiplicative velocity decay, in (0, 1] (default: 0.99)
    #[serde(default = "default_decay")]
    pub decay: f64,

    /// Per-axis velocity bound in m/s (default: 2.0)
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,

    /// Emit a diagnostic log line every N integrated samples (default: 50)
    #[serde(default = "default_log_interval")]
    pub log_interval: u64,
}

fn default_calibration_samples() -> usize {
    3
}
fn default_decay() -> f64 {
    0.99
}
fn default_max_velocity() -> f64 {
    2.0
}
fn default_log_interval() -> u64 {
    50
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            calibration_samples: default_calibration_samples(),
            decay: default_decay(),
            max_velocity: default_max_velocity(),
            log_interval: default_log_interval(),
        }
    }
}

impl EstimatorConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CALIBRATION_SAMPLES).contains(&self.calibration_samples) {
            return Err(Error::InvalidParameter(format!(
                "calibration_samples must be in 1..={}, got {}",
                MAX_CALIBRATION_SAMPLES, self.calibration_samples
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "decay must be in (0, 1], got {}",
                self.decay
            )));
        }
        if !(self.max_velocity.is_finite() && self.max_velocity > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "max_velocity must be positive and finite, got {}",
                self.max_velocity
            )));
        }
        if self.log_interval == 0 {
            return Err(Error::InvalidParameter(
                "log_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
