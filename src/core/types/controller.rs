//! Controller report types
//!
//! A [`ControllerStatus`] is one full report from a handheld controller:
//! raw IMU axes, the analog stick, the flattened button set and the battery.
//! Raw values are kept in device units; scaling happens in
//! [`crate::normalize`].

use super::vector::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which hand a controller belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerSide {
    Left,
    Right,
}

impl ControllerSide {
    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerSide::Left => "left",
            ControllerSide::Right => "right",
        }
    }
}

impl fmt::Display for ControllerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw analog stick position (12-bit, ~0..4095, centered near 2048)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StickPosition {
    pub horizontal: u16,
    pub vertical: u16,
}

impl StickPosition {
    pub fn new(horizontal: u16, vertical: u16) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Stick at rest
    pub fn centered() -> Self {
        Self::new(2048, 2048)
    }
}

/// Battery report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Battery {
    /// Charge level, 0 (empty) to 4 (full)
    pub level: u8,
    pub charging: bool,
}

/// Flattened digital button state for one controller.
///
/// Right-hand and left-hand groups both appear in every report; the buttons
/// physically absent on a given side simply stay `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonState {
    // Right group
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub r: bool,
    pub zr: bool,
    pub sl_right: bool,
    pub sr_right: bool,

    // Left group
    pub l: bool,
    pub zl: bool,
    pub sl_left: bool,
    pub sr_left: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,

    // Shared group
    pub plus: bool,
    pub minus: bool,
    pub home: bool,
    pub capture: bool,
    pub stick_left: bool,
    pub stick_right: bool,
    pub charging_grip: bool,
}

/// One full controller report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub side: ControllerSide,
    /// Accelerometer, raw device units (gravity included)
    pub accel: Vector3,
    /// Gyroscope, raw device units
    pub gyro: Vector3,
    pub stick: StickPosition,
    pub buttons: ButtonState,
    pub battery: Battery,
}
