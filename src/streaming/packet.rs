//! Teleop packet sent once per tick.
//!
//! One flat record covering both controllers. Field names are stable: UDP
//! consumers key on them directly.
//!
//! ```text
//! {
//!   "ts": 1718000000.123,              seconds since UNIX epoch
//!   "lx": 0.0, "ly": 0.0,              left stick, normalized [-1, 1]
//!   "rx": 0.0, "ry": 0.0,              right stick, normalized [-1, 1]
//!   "left_buttons": {...},             23 flattened buttons
//!   "left_accel": {"x":..,"y":..,"z":..},     normalized [-1, 1]
//!   "left_gyro": {...},                normalized [-1, 1]
//!   "left_velocity": {...},            m/s, bounded
//!   "left_calibrated": true,
//!   "left_battery": {"level": 4, "charging": false},
//!   ... same for right_*
//! }
//! ```

use crate::core::types::{Battery, ButtonState, Vector3};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Processed state of one controller for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideState {
    /// Normalized stick `(x, y)`
    pub stick: (f64, f64),
    pub buttons: ButtonState,
    /// Normalized accelerometer
    pub accel: Vector3,
    /// Normalized gyroscope
    pub gyro: Vector3,
    /// Estimated velocity
    pub velocity: Vector3,
    /// False while the estimator is still collecting gravity samples
    pub calibrated: bool,
    pub battery: Battery,
}

/// Flat per-tick record for both controllers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleopPacket {
    pub ts: f64,
    pub lx: f64,
    pub ly: f64,
    pub rx: f64,
    pub ry: f64,
    pub left_buttons: ButtonState,
    pub right_buttons: ButtonState,
    pub left_accel: Vector3,
    pub right_accel: Vector3,
    pub left_gyro: Vector3,
    pub right_gyro: Vector3,
    pub left_velocity: Vector3,
    pub right_velocity: Vector3,
    pub left_calibrated: bool,
    pub right_calibrated: bool,
    pub left_battery: Battery,
    pub right_battery: Battery,
}

impl TeleopPacket {
    /// Assemble a packet from both sides' state
    pub fn new(ts: f64, left: &SideState, right: &SideState) -> Self {
        Self {
            ts,
            lx: left.stick.0,
            ly: left.stick.1,
            rx: right.stick.0,
            ry: right.stick.1,
            left_buttons: left.buttons,
            right_buttons: right.buttons,
            left_accel: left.accel,
            right_accel: right.accel,
            left_gyro: left.gyro,
            right_gyro: right.gyro,
            left_velocity: left.velocity,
            right_velocity: right.velocity,
            left_calibrated: left.calibrated,
            right_calibrated: right.calibrated,
            left_battery: left.battery,
            right_battery: right.battery,
        }
    }
}

/// Wall-clock seconds since UNIX epoch
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
