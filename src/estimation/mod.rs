//! Motion estimation.
//!
//! - [`VelocityEstimator`]: Gravity-calibrated, drift-limited velocity from
//!   raw acceleration
//! - [`EstimatorConfig`]: Calibration sample count, decay and velocity bound

mod config;
mod velocity;

pub use config::{EstimatorConfig, MAX_CALIBRATION_SAMPLES};
pub use velocity::{CalibrationState, VelocityEstimator};
