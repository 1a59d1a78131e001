//! Configuration for joymotion
//!
//! Loads configuration from a TOML file. Every section and field has a
//! default, so an empty file (or no file) yields a working mock setup that
//! streams to `127.0.0.1:5005`.

use crate::devices::mock::SimulationConfig;
use crate::error::{Error, Result};
use crate::estimation::EstimatorConfig;
use crate::normalize::NormalizationConfig;
use crate::streaming::WireFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub normalization: NormalizationConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub plot: PlotConfig,
}

/// Controller acquisition settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Driver type (currently only "mock")
    #[serde(default = "default_device_type")]
    pub device_type: String,

    /// Fixed tick rate for both controllers (default: 100 Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: f64,

    /// Use measured elapsed time as `dt` instead of the nominal tick
    #[serde(default)]
    pub adaptive_dt: bool,

    /// Sleep after a failed tick before retrying (default: 100 ms)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Mock controller parameters
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_device_type() -> String {
    "mock".to_string()
}
fn default_sample_rate() -> f64 {
    100.0
}
fn default_retry_backoff_ms() -> u64 {
    100
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
            sample_rate_hz: default_sample_rate(),
            adaptive_dt: false,
            retry_backoff_ms: default_retry_backoff_ms(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Nominal tick interval in seconds
    pub fn tick_secs(&self) -> f64 {
        1.0 / self.sample_rate_hz
    }

    /// Nominal tick interval, or [`Error::Config`] if the rate yields an
    /// interval a [`Duration`] cannot hold
    pub fn tick_interval(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.tick_secs()).map_err(|e| {
            Error::Config(format!(
                "device.sample_rate_hz {} gives an unusable tick interval: {}",
                self.sample_rate_hz, e
            ))
        })
    }
}

/// UDP packet output
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    /// Destination for teleop packets
    ///
    /// Examples:
    /// - `127.0.0.1:5005` - Local consumer (default)
    /// - `192.168.1.20:5005` - Consumer on another host
    #[serde(default = "default_dest_address")]
    pub dest_address: String,

    /// Packet encoding
    #[serde(default)]
    pub wire_format: WireFormat,

    /// Capacity of the sampler → publisher queue (default: 256 packets)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_dest_address() -> String {
    "127.0.0.1:5005".to_string()
}
fn default_queue_capacity() -> usize {
    256
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            dest_address: default_dest_address(),
            wire_format: WireFormat::default(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl StreamingConfig {
    /// Parsed destination address
    pub fn dest(&self) -> Result<SocketAddr> {
        self.dest_address.parse().map_err(|e| {
            Error::Config(format!(
                "Invalid dest_address '{}': {}",
                self.dest_address, e
            ))
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Velocity recording and plot output
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlotConfig {
    /// Recording length in seconds (default: 10)
    #[serde(default = "default_duration")]
    pub duration_secs: f64,

    /// SVG output path
    #[serde(default = "default_plot_output")]
    pub output: String,

    /// Angular rate at normalized gyro = 1.0 (default: 34.9 rad/s ≈ 2000°/s)
    #[serde(default = "default_max_gyro_rad_s")]
    pub max_gyro_rad_s: f64,
}

fn default_duration() -> f64 {
    10.0
}
fn default_plot_output() -> String {
    "output/velocity.svg".to_string()
}
fn default_max_gyro_rad_s() -> f64 {
    34.9
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            output: default_plot_output(),
            max_gyro_rad_s: default_max_gyro_rad_s(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use joymotion::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("joymotion.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else `joymotion.toml` in the working
    /// directory if present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            log::info!("Loading configuration from {}", path.display());
            return Self::from_file(path);
        }
        let local = Path::new("joymotion.toml");
        if local.exists() {
            log::info!("Loading configuration from joymotion.toml");
            return Self::from_file(local);
        }
        log::info!("Using default configuration");
        Ok(Self::default())
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check cross-section parameter ranges
    pub fn validate(&self) -> Result<()> {
        self.estimator.validate()?;

        let rate = self.device.sample_rate_hz;
        if !(rate.is_finite() && rate > 0.0) {
            return Err(Error::Config(format!(
                "device.sample_rate_hz must be positive, got {}",
                rate
            )));
        }
        self.device.tick_interval()?;

        let norm = &self.normalization;
        for (name, value) in [
            ("max_accel", norm.max_accel),
            ("max_gyro", norm.max_gyro),
            ("stick.span", norm.stick.span),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!(
                    "normalization.{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if self.streaming.queue_capacity == 0 {
            return Err(Error::Config(
                "streaming.queue_capacity must be at least 1".to_string(),
            ));
        }
        if !(self.plot.duration_secs.is_finite() && self.plot.duration_secs > 0.0) {
            return Err(Error::Config(format!(
                "plot.duration_secs must be positive, got {}",
                self.plot.duration_secs
            )));
        }
        self.streaming.dest()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.device.device_type, "mock");
        assert_eq!(config.device.sample_rate_hz, 100.0);
        assert_eq!(config.streaming.dest_address, "127.0.0.1:5005");
        assert_eq!(config.streaming.wire_format, WireFormat::Json);
        assert_eq!(config.estimator.calibration_samples, 3);
        assert_eq!(config.normalization.max_accel, 6000.0);
        assert_eq!(config.plot.duration_secs, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.device.retry_backoff_ms, 100);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[device]"));
        assert!(toml_string.contains("[estimator]"));
        assert!(toml_string.contains("[streaming]"));
        assert!(toml_string.contains("[logging]"));
        assert!(toml_string.contains("decay = 0.99"));
        assert!(toml_string.contains("dest_address = \"127.0.0.1:5005\""));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[device]
sample_rate_hz = 60.0
adaptive_dt = true

[device.simulation]
random_seed = 7
dropout_probability = 0.05

[estimator]
calibration_samples = 10
max_velocity = 1.5

[normalization.stick]
deadzone = 0.1

[streaming]
dest_address = "127.0.0.1:6000"
wire_format = "postcard"

[logging]
level = "debug"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.device.sample_rate_hz, 60.0);
        assert!(config.device.adaptive_dt);
        assert_eq!(config.device.simulation.random_seed, 7);
        assert_eq!(config.estimator.calibration_samples, 10);
        assert_eq!(config.estimator.decay, 0.99);
        assert_eq!(config.normalization.stick.deadzone, 0.1);
        assert_eq!(config.normalization.stick.center, 2048.0);
        assert_eq!(config.streaming.wire_format, WireFormat::Postcard);
        assert_eq!(config.streaming.dest().unwrap().port(), 6000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut config = AppConfig::default();
        config.streaming.dest_address = "not-an-address".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let mut config = AppConfig::default();
        config.device.sample_rate_hz = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unschedulable_rate() {
        let config: AppConfig = toml::from_str("[device]\nsample_rate_hz = 1e-300").unwrap();
        assert!(config.device.tick_interval().is_err());
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = AppConfig::default();
        config.device.sample_rate_hz = 4.0;
        assert_eq!(
            config.device.tick_interval().unwrap(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_validate_rejects_nan_full_scale() {
        for section in [
            "[normalization]\nmax_accel = nan",
            "[normalization]\nmax_gyro = nan",
            "[normalization]\nmax_gyro = inf",
            "[normalization.stick]\nspan = nan",
            "[normalization.stick]\nspan = -1.0",
        ] {
            let config: AppConfig = toml::from_str(section).unwrap();
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "{} should be rejected",
                section
            );
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("joymotion.toml");

        let mut config = AppConfig::default();
        config.estimator.decay = 0.95;
        config.to_file(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.estimator.decay, 0.95);
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/joymotion.toml");
        let config = AppConfig::from_file(path).unwrap();
        let defaults = AppConfig::default();

        assert_eq!(config.estimator, defaults.estimator);
        assert_eq!(config.normalization, defaults.normalization);
        assert_eq!(config.device.simulation, defaults.device.simulation);
        assert_eq!(config.streaming.dest_address, defaults.streaming.dest_address);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = AppConfig::from_file("/nonexistent/joymotion.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
