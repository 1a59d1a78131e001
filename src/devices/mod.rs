//! Device implementations

pub mod mock;

use crate::config::DeviceConfig;
use crate::core::driver::ControllerDriver;
use crate::core::types::ControllerSide;
use crate::error::{Error, Result};
use mock::MockController;

/// Create a controller driver for one side based on configuration
pub fn create_device(
    config: &DeviceConfig,
    side: ControllerSide,
) -> Result<Box<dyn ControllerDriver>> {
    match config.device_type.as_str() {
        "mock" => {
            let driver =
                MockController::new(side, config.simulation.clone(), config.sample_rate_hz)?;
            log::info!("{} controller: {}", side, driver.name());
            Ok(Box::new(driver))
        }
        _ => Err(Error::UnknownDevice(config.device_type.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock() {
        let config = DeviceConfig::default();
        let driver = create_device(&config, ControllerSide::Right).unwrap();
        assert_eq!(driver.side(), ControllerSide::Right);
        assert_eq!(driver.name(), "Mock Controller (R)");
    }

    #[test]
    fn test_unknown_device() {
        let config = DeviceConfig {
            device_type: "bluetooth".to_string(),
            ..DeviceConfig::default()
        };
        let result = create_device(&config, ControllerSide::Left);
        assert!(matches!(result, Err(Error::UnknownDevice(ref t)) if t == "bluetooth"));
    }
}
