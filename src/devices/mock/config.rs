//! Mock controller simulation configuration
//!
//! Every parameter has a default in raw device units, so an empty
//! `[device.simulation]` section is a valid configuration.
//!
//! # Default Values
//!
//! | Parameter | Default | Meaning |
//! |-----------|---------|---------|
//! | gravity_raw | 4096 | Raw accel reading for 1g on the Z axis |
//! | accel_noise_stddev | 20 | Raw accel noise per axis |
//! | motion_amplitude | 1500 | Raw peak accel of the X-axis oscillation |
//! | motion_frequency_hz | 0.5 | Oscillation frequency |
//! | gyro_amplitude | 1200 | Raw peak gyro of the Z-axis sway |
//! | dropout_probability | 0.0 | Chance a read times out |

use serde::{Deserialize, Serialize};

/// Simulated controller behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// RNG seed; 0 = random each run. The right controller uses `seed + 1`.
    #[serde(default = "default_seed")]
    pub random_seed: u64,

    /// Raw accelerometer value for 1g, reported on the Z axis at rest
    #[serde(default = "default_gravity_raw")]
    pub gravity_raw: f64,

    /// Accelerometer noise standard deviation (raw units)
    #[serde(default = "default_accel_noise")]
    pub accel_noise_stddev: f64,

    /// Gyroscope noise standard deviation (raw units)
    #[serde(default = "default_gyro_noise")]
    pub gyro_noise_stddev: f64,

    /// Peak X-axis acceleration of the simulated hand motion (raw units)
    #[serde(default = "default_motion_amplitude")]
    pub motion_amplitude: f64,

    /// Frequency of the simulated hand motion
    #[serde(default = "default_motion_frequency")]
    pub motion_frequency_hz: f64,

    /// Peak Z-axis angular rate of the simulated wrist sway (raw units)
    #[serde(default = "default_gyro_amplitude")]
    pub gyro_amplitude: f64,

    /// Seconds held still at start, so calibration sees a stationary device
    #[serde(default = "default_settle_secs")]
    pub settle_secs: f64,

    /// Raw stick jitter around center
    #[serde(default = "default_stick_noise")]
    pub stick_noise_stddev: f64,

    /// Probability that a read times out (0.0-1.0)
    #[serde(default)]
    pub dropout_probability: f64,

    /// Reported battery level (0-4)
    #[serde(default = "default_battery_level")]
    pub battery_level: u8,
}

fn default_seed() -> u64 {
    42
}
fn default_gravity_raw() -> f64 {
    4096.0
}
fn default_accel_noise() -> f64 {
    20.0
}
fn default_gyro_noise() -> f64 {
    15.0
}
fn default_motion_amplitude() -> f64 {
    1500.0
}
fn default_motion_frequency() -> f64 {
    0.5
}
fn default_gyro_amplitude() -> f64 {
    1200.0
}
fn default_settle_secs() -> f64 {
    0.5
}
fn default_stick_noise() -> f64 {
    8.0
}
fn default_battery_level() -> u8 {
    4
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_seed: default_seed(),
            gravity_raw: default_gravity_raw(),
            accel_noise_stddev: default_accel_noise(),
            gyro_noise_stddev: default_gyro_noise(),
            motion_amplitude: default_motion_amplitude(),
            motion_frequency_hz: default_motion_frequency(),
            gyro_amplitude: default_gyro_amplitude(),
            settle_secs: default_settle_secs(),
            stick_noise_stddev: default_stick_noise(),
            dropout_probability: 0.0,
            battery_level: default_battery_level(),
        }
    }
}

impl SimulationConfig {
    /// Noise-free, motionless controller. Useful for tests.
    pub fn stationary() -> Self {
        Self {
            accel_noise_stddev: 0.0,
            gyro_noise_stddev: 0.0,
            motion_amplitude: 0.0,
            gyro_amplitude: 0.0,
            stick_noise_stddev: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_uses_defaults() {
        let config: SimulationConfig = toml::from_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_stationary_has_no_motion() {
        let config = SimulationConfig::stationary();
        assert_eq!(config.motion_amplitude, 0.0);
        assert_eq!(config.accel_noise_stddev, 0.0);
        assert_eq!(config.gravity_raw, 4096.0);
    }
}
