//! joymotion - Motion controller velocity estimation and teleop bridge
//!
//! Reads a pair of handheld motion controllers, turns their accelerometer
//! streams into bounded velocity estimates and publishes one flat packet per
//! tick over UDP.
//!
//! ```text
//! ┌──────────────┐  ControllerStatus  ┌─────────────┐  TeleopPacket  ┌──────────────┐
//! │ devices/     │ ─────────────────▶ │ teleop      │ ─────────────▶ │ streaming/   │
//! │ (L + R)      │                    │ normalize + │                │ UdpPublisher │
//! └──────────────┘                    │ estimation  │                └──────────────┘
//!                                     └─────────────┘
//! ```

pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod estimation;
pub mod normalize;
pub mod plot;
pub mod streaming;
pub mod teleop;

// Re-export commonly used types
pub use config::AppConfig;
pub use core::types::{ControllerSide, ControllerStatus, Timestamped, Vector3};
pub use error::{Error, Result};
pub use estimation::{CalibrationState, EstimatorConfig, VelocityEstimator};
pub use teleop::{TeleopLoop, TickOutput};
