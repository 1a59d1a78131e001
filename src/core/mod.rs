//! Core abstractions for controller drivers.
//!
//! - [`driver::ControllerDriver`]: Trait to implement for new hardware
//! - [`types`]: Vectors, controller reports and timestamped values

pub mod driver;
pub mod types;
