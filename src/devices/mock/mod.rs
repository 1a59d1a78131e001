//! Mock controller driver for hardware-free testing
//!
//! Simulates a handheld controller held still for a short settle period and
//! then swung back and forth along its X axis.
//!
//! | Output | Simulation |
//! |--------|------------|
//! | Accelerometer | Gravity on +Z, sinusoidal X motion, Gaussian noise |
//! | Gyroscope | Sinusoidal Z sway, Gaussian noise |
//! | Stick | Centered with jitter |
//! | Buttons | Trigger (ZL / ZR) held while moving |
//! | Battery | Fixed level |
//!
//! Simulated time advances by one tick per [`MockController::read_status`]
//! call, independent of wall-clock time, so runs with a fixed seed are
//! reproducible.
//!
//! Example configuration:
//!
//! ```toml
//! [device]
//! device_type = "mock"
//! sample_rate_hz = 100.0
//!
//! [device.simulation]
//! random_seed = 42
//! motion_amplitude = 1500.0
//! dropout_probability = 0.01
//! ```

pub mod config;
mod noise;

pub use config::SimulationConfig;
use noise::SensorNoise;

use crate::core::driver::ControllerDriver;
use crate::core::types::{
    Battery, ButtonState, ControllerSide, ControllerStatus, StickPosition, Vector3,
};
use crate::error::{Error, Result};
use std::f64::consts::PI;

/// Maximum raw stick value (12-bit)
const STICK_MAX: f64 = 4095.0;

/// Simulated controller
pub struct MockController {
    side: ControllerSide,
    name: String,
    config: SimulationConfig,
    noise: SensorNoise,
    tick_secs: f64,
    /// Simulated seconds since power-on
    t: f64,
}

impl MockController {
    /// Create a mock controller sampled at `sample_rate_hz`.
    pub fn new(
        side: ControllerSide,
        config: SimulationConfig,
        sample_rate_hz: f64,
    ) -> Result<Self> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "sample_rate_hz must be positive, got {}",
                sample_rate_hz
            )));
        }

        let name = match side {
            ControllerSide::Left => "Mock Controller (L)",
            ControllerSide::Right => "Mock Controller (R)",
        };

        Ok(Self {
            side,
            name: name.to_string(),
            noise: SensorNoise::for_side(config.random_seed, side),
            config,
            tick_secs: 1.0 / sample_rate_hz,
            t: 0.0,
        })
    }

    /// Simulated seconds elapsed
    pub fn elapsed(&self) -> f64 {
        self.t
    }

    /// Phase of the motion pattern; right hand mirrors the left
    fn motion_phase(&self) -> Option<f64> {
        let moving = self.t - self.config.settle_secs;
        if moving < 0.0 {
            return None;
        }
        let offset = match self.side {
            ControllerSide::Left => 0.0,
            ControllerSide::Right => PI,
        };
        Some(2.0 * PI * self.config.motion_frequency_hz * moving + offset)
    }

    fn stick_axis(&mut self) -> u16 {
        let value = 2048.0 + self.noise.stick_jitter(self.config.stick_noise_stddev);
        value.round().clamp(0.0, STICK_MAX) as u16
    }
}

impl ControllerDriver for MockController {
    fn side(&self) -> ControllerSide {
        self.side
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn read_status(&mut self) -> Result<ControllerStatus> {
        self.t += self.tick_secs;

        if self.noise.read_drops(self.config.dropout_probability) {
            log::trace!("{}: simulated read timeout at t={:.3}s", self.name, self.t);
            return Err(Error::Timeout);
        }

        let phase = self.motion_phase();
        let (motion, sway) = match phase {
            Some(p) => (
                self.config.motion_amplitude * p.sin(),
                self.config.gyro_amplitude * p.cos(),
            ),
            None => (0.0, 0.0),
        };

        let accel = Vector3::new(motion, 0.0, self.config.gravity_raw)
            + self.noise.imu(self.config.accel_noise_stddev);
        let gyro = Vector3::new(0.0, 0.0, sway) + self.noise.imu(self.config.gyro_noise_stddev);

        let stick = StickPosition::new(self.stick_axis(), self.stick_axis());

        let mut buttons = ButtonState::default();
        let moving = phase.is_some();
        match self.side {
            ControllerSide::Left => buttons.zl = moving,
            ControllerSide::Right => buttons.zr = moving,
        }

        Ok(ControllerStatus {
            side: self.side,
            accel,
            gyro,
            stick,
            buttons,
            battery: Battery {
                level: self.config.battery_level.min(4),
                charging: false,
            },
        })
    }
}
