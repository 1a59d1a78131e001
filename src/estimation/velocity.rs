//! Streaming velocity estimator for one controller.
//!
//! Converts gravity-biased accelerometer samples into bounded velocity
//! estimates. Open-loop integration with no absolute reference drifts, so
//! every step is followed by a multiplicative decay and a per-axis clamp.
//!
//! # Pipeline
//!
//! ```text
//! raw ──► calibrate (first N samples) ──► gravity offset
//!  │
//!  └──► corrected = raw - offset
//!         v += (corrected + prev) / 2 * dt     trapezoidal step
//!         v *= decay
//!         prev = corrected
//!         v = clamp(v, ±max_velocity)
//! ```
//!
//! # Example
//!
//! ```
//! use joymotion::{EstimatorConfig, Vector3, VelocityEstimator};
//!
//! let mut estimator = VelocityEstimator::new(EstimatorConfig::default())?;
//! let gravity = Vector3::new(0.0, 0.0, 9.8);
//!
//! for _ in 0..3 {
//!     assert_eq!(estimator.update(gravity, 0.01)?, Vector3::ZERO);
//! }
//! assert!(estimator.is_calibrated());
//!
//! let v = estimator.update(Vector3::new(1.0, 0.0, 9.8), 0.01)?;
//! assert!((v.x - 0.00495).abs() < 1e-6);
//! # Ok::<(), joymotion::Error>(())
//! ```

use super::config::EstimatorConfig;
use crate::core::types::Vector3;
use crate::error::{Error, Result};

/// Gravity calibration state.
///
/// The transition `Collecting -> Ready` happens exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationState {
    /// Still averaging stationary samples
    Collecting { samples: Vec<Vector3> },
    /// Gravity offset fixed for the lifetime of the estimator
    Ready { offset: Vector3 },
}

impl CalibrationState {
    fn collecting() -> Self {
        CalibrationState::Collecting {
            samples: Vec::new(),
        }
    }
}

/// Per-device velocity estimator.
///
/// Not thread-safe by itself (takes `&mut self`); run one instance per
/// controller. Instances share nothing.
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    config: EstimatorConfig,
    calibration: CalibrationState,
    velocity: Vector3,
    /// Previous gravity-corrected acceleration (zero until the first step)
    prev_corrected: Vector3,
    /// Integrated samples since calibration
    sample_count: u64,
}

impl VelocityEstimator {
    /// Create a new estimator.
    ///
    /// Returns [`Error::InvalidParameter`] if `config` fails validation.
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_validated(config))
    }

    fn with_validated(config: EstimatorConfig) -> Self {
        Self {
            config,
            calibration: CalibrationState::collecting(),
            velocity: Vector3::ZERO,
            prev_corrected: Vector3::ZERO,
            sample_count: 0,
        }
    }

    /// Feed one raw accelerometer sample taken `dt` seconds after the
    /// previous one.
    ///
    /// Returns the zero vector while calibrating (including on the sample
    /// that completes calibration), then the clamped velocity estimate.
    ///
    /// Non-positive or non-finite `dt` and non-finite samples are rejected
    /// with [`Error::InvalidInput`]; the estimator state is left untouched.
    pub fn update(&mut self, raw_accel: Vector3, dt: f64) -> Result<Vector3> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidInput(format!(
                "tick interval must be positive and finite, got {}",
                dt
            )));
        }
        if !raw_accel.is_finite() {
            return Err(Error::InvalidInput(format!(
                "non-finite acceleration sample {:?}",
                raw_accel
            )));
        }

        let offset = match &mut self.calibration {
            CalibrationState::Collecting { samples } => {
                samples.push(raw_accel);
                let required = self.config.calibration_samples;

                if samples.len() < required {
                    log::debug!("Calibrating gravity... samples: {}/{}", samples.len(), required);
                    return Ok(Vector3::ZERO);
                }

                // Holds at least the sample just pushed
                debug_assert!(!samples.is_empty());
                let offset = Vector3::mean(samples).unwrap_or(raw_accel);
                log::info!(
                    "Gravity calibrated: x={:.3}, y={:.3}, z={:.3}",
                    offset.x,
                    offset.y,
                    offset.z
                );
                self.calibration = CalibrationState::Ready { offset };
                // The calibration-completing sample is not integrated
                return Ok(Vector3::ZERO);
            }
            CalibrationState::Ready { offset } => *offset,
        };

        self.sample_count += 1;

        let corrected = raw_accel - offset;
        let delta = (corrected + self.prev_corrected) / 2.0 * dt;

        self.velocity += delta;
        self.velocity *= self.config.decay;
        self.prev_corrected = corrected;
        self.velocity = self.velocity.clamp_components(self.config.max_velocity);

        if self.sample_count % self.config.log_interval == 0 {
            log::debug!(
                "Sample {}: accel mag {:.3}, vel mag {:.3}, dV ({:.4}, {:.4}, {:.4}), V ({:.4}, {:.4}, {:.4})",
                self.sample_count,
                corrected.magnitude(),
                self.velocity.magnitude(),
                delta.x,
                delta.y,
                delta.z,
                self.velocity.x,
                self.velocity.y,
                self.velocity.z
            );
        }

        Ok(self.velocity)
    }

    /// Whether the gravity offset has been computed.
    pub fn is_calibrated(&self) -> bool {
        matches!(self.calibration, CalibrationState::Ready { .. })
    }

    /// Calibration progress as `(collected, required)`.
    pub fn calibration_progress(&self) -> (usize, usize) {
        let required = self.config.calibration_samples;
        match &self.calibration {
            CalibrationState::Collecting { samples } => (samples.len(), required),
            CalibrationState::Ready { .. } => (required, required),
        }
    }

    /// Gravity offset, once calibrated.
    pub fn gravity_offset(&self) -> Option<Vector3> {
        match self.calibration {
            CalibrationState::Ready { offset } => Some(offset),
            CalibrationState::Collecting { .. } => None,
        }
    }

    /// Calibration state.
    pub fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    /// Current velocity estimate (zero until calibrated).
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Number of samples integrated since calibration.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Get the current configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::with_validated(EstimatorConfig::default())
    }
}
