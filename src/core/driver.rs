//! ControllerDriver trait definition

use crate::core::types::{ControllerSide, ControllerStatus};
use crate::error::Result;

/// Controller driver trait for device acquisition
///
/// One driver per physical controller. Implementations should return
/// [`crate::Error::Timeout`] for a missed report so the caller can skip the
/// tick, and [`crate::Error::DeviceDisconnected`] when the device is gone.
pub trait ControllerDriver: Send {
    /// Which hand this controller belongs to
    fn side(&self) -> ControllerSide;

    /// Human-readable device name for logs
    fn name(&self) -> &str;

    /// Read the latest full report
    fn read_status(&mut self) -> Result<ControllerStatus>;
}
