//! Core data types
//!
//! - [`Vector3`]: 3-axis sample / velocity
//! - [`Timestamped<T>`]: Session-relative timestamp wrapper
//! - [`ControllerStatus`]: One controller report (IMU, stick, buttons, battery)

mod controller;
mod timestamped;
mod vector;

pub use controller::{Battery, ButtonState, ControllerSide, ControllerStatus, StickPosition};
pub use timestamped::Timestamped;
pub use vector::Vector3;
