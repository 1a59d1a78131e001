//! Scalar normalization for sticks and IMU axes.
//!
//! Raw controller values are mapped into `[-1, 1]`. Sticks get a deadzone
//! around center; IMU axes are divided by an observed full-scale value and
//! clamped.

use crate::core::types::Vector3;
use serde::{Deserialize, Serialize};

/// Stick calibration (12-bit raw range)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickConfig {
    /// Raw value at rest (default: 2048)
    #[serde(default = "default_center")]
    pub center: f64,

    /// Raw distance from center to full deflection (default: 2048)
    #[serde(default = "default_span")]
    pub span: f64,

    /// Normalized magnitude treated as zero (default: 0.05)
    #[serde(default = "default_deadzone")]
    pub deadzone: f64,
}

fn default_center() -> f64 {
    2048.0
}
fn default_span() -> f64 {
    2048.0
}
fn default_deadzone() -> f64 {
    0.05
}

impl Default for StickConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            span: default_span(),
            deadzone: default_deadzone(),
        }
    }
}

/// Full normalization settings (`[normalization]` TOML section)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Raw accelerometer full scale (default: 6000)
    #[serde(default = "default_max_accel")]
    pub max_accel: f64,

    /// Raw gyroscope full scale (default: 5000)
    #[serde(default = "default_max_gyro")]
    pub max_gyro: f64,

    #[serde(default)]
    pub stick: StickConfig,
}

fn default_max_accel() -> f64 {
    6000.0
}
fn default_max_gyro() -> f64 {
    5000.0
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            stick: StickConfig::default(),
            max_accel: default_max_accel(),
            max_gyro: default_max_gyro(),
        }
    }
}

/// Map a raw stick axis to `[-1, 1]`, zeroing values inside the deadzone.
pub fn normalize_axis(raw: u16, config: &StickConfig) -> f64 {
    let x = (raw as f64 - config.center) / config.span;
    if x.abs() < config.deadzone {
        return 0.0;
    }
    x.clamp(-1.0, 1.0)
}

/// Divide each component by `full_scale` and clamp to `[-1, 1]`.
pub fn normalize_vector(raw: Vector3, full_scale: f64) -> Vector3 {
    (raw / full_scale).clamp_components(1.0)
}

/// Normalize raw accelerometer axes
pub fn normalize_accel(raw: Vector3, config: &NormalizationConfig) -> Vector3 {
    normalize_vector(raw, config.max_accel)
}

/// Normalize raw gyroscope axes
pub fn normalize_gyro(raw: Vector3, config: &NormalizationConfig) -> Vector3 {
    normalize_vector(raw, config.max_gyro)
}
