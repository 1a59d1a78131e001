//! Teleop loop: both controllers → estimators → packets.
//!
//! One thread drives both sides sequentially. A tick reads the left and the
//! right controller; if either read fails the whole tick is skipped and no
//! sample reaches either estimator, so both filters always see the same
//! sequence of intervals.
//!
//! # Timing
//!
//! Ticks are scheduled at `sample_rate_hz`. The `dt` fed to the estimators is
//! the nominal interval unless `adaptive_dt` is set, in which case it is the
//! wall time since the last successful tick (so a skipped tick widens the
//! next interval instead of being lost).

use crate::config::{AppConfig, DeviceConfig};
use crate::core::driver::ControllerDriver;
use crate::core::types::{ControllerSide, ControllerStatus, Vector3};
use crate::devices::create_device;
use crate::error::{Error, Result};
use crate::estimation::VelocityEstimator;
use crate::normalize::{NormalizationConfig, normalize_accel, normalize_axis, normalize_gyro};
use crate::streaming::{SideState, TeleopPacket, unix_timestamp};
use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Successful ticks between progress log lines
const PROGRESS_INTERVAL: u64 = 500;

/// Result of one successful tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub packet: TeleopPacket,
    /// Interval fed to both estimators
    pub dt: f64,
}

/// Loop counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeleopStats {
    /// Successful ticks
    pub ticks: u64,
    /// Ticks skipped after a read failure
    pub skipped: u64,
    /// Packets dropped because the publisher queue was full
    pub dropped: u64,
}

/// Owns both controllers and their estimators
pub struct TeleopLoop {
    left: Box<dyn ControllerDriver>,
    right: Box<dyn ControllerDriver>,
    left_estimator: VelocityEstimator,
    right_estimator: VelocityEstimator,
    normalization: NormalizationConfig,
    device: DeviceConfig,
    stats: TeleopStats,
}

impl TeleopLoop {
    /// Build a loop from two drivers.
    ///
    /// `left` and `right` must report the matching [`ControllerSide`].
    pub fn new(
        left: Box<dyn ControllerDriver>,
        right: Box<dyn ControllerDriver>,
        config: &AppConfig,
    ) -> Result<Self> {
        let pairs = [(&left, ControllerSide::Left), (&right, ControllerSide::Right)];
        for (driver, expected) in pairs {
            if driver.side() != expected {
                return Err(Error::InvalidParameter(format!(
                    "{} driver '{}' reports side {}",
                    expected,
                    driver.name(),
                    driver.side()
                )));
            }
        }

        Ok(Self {
            left,
            right,
            left_estimator: VelocityEstimator::new(config.estimator)?,
            right_estimator: VelocityEstimator::new(config.estimator)?,
            normalization: config.normalization,
            device: config.device.clone(),
            stats: TeleopStats::default(),
        })
    }

    /// Create both drivers from `[device]` and build the loop
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let left = create_device(&config.device, ControllerSide::Left)?;
        let right = create_device(&config.device, ControllerSide::Right)?;
        Self::new(left, right, config)
    }

    /// Read both controllers, update both estimators and assemble a packet.
    ///
    /// Any read failure is returned before either estimator is touched.
    pub fn tick(&mut self, dt: f64) -> Result<TickOutput> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidInput(format!(
                "tick interval must be positive and finite, got {}",
                dt
            )));
        }

        let left_status = self.left.read_status()?;
        let right_status = self.right.read_status()?;

        let left_accel = normalize_accel(left_status.accel, &self.normalization);
        let right_accel = normalize_accel(right_status.accel, &self.normalization);
        if !(left_accel.is_finite() && right_accel.is_finite()) {
            return Err(Error::InvalidInput("non-finite accelerometer reading".to_string()));
        }

        let left_velocity = self.left_estimator.update(left_accel, dt)?;
        let right_velocity = self.right_estimator.update(right_accel, dt)?;

        let left = self.side_state(&left_status, left_accel, left_velocity, true);
        let right = self.side_state(&right_status, right_accel, right_velocity, false);

        Ok(TickOutput {
            packet: TeleopPacket::new(unix_timestamp(), &left, &right),
            dt,
        })
    }

    fn side_state(
        &self,
        status: &ControllerStatus,
        accel: Vector3,
        velocity: Vector3,
        is_left: bool,
    ) -> SideState {
        let estimator = if is_left {
            &self.left_estimator
        } else {
            &self.right_estimator
        };
        let stick = &self.normalization.stick;

        SideState {
            stick: (
                normalize_axis(status.stick.horizontal, stick),
                normalize_axis(status.stick.vertical, stick),
            ),
            buttons: status.buttons,
            accel,
            gyro: normalize_gyro(status.gyro, &self.normalization),
            velocity,
            calibrated: estimator.is_calibrated(),
            battery: status.battery,
        }
    }

    /// Tick at `sample_rate_hz` and queue packets on `tx` until `running` is
    /// cleared or the receiver hangs up.
    ///
    /// Transient read failures and rejected samples are logged and retried
    /// after `retry_backoff_ms`; anything else ends the loop with an error.
    pub fn run(
        &mut self,
        tx: &Sender<TeleopPacket>,
        running: &AtomicBool,
    ) -> Result<TeleopStats> {
        let nominal = self.device.tick_secs();
        let interval = self.device.tick_interval()?;
        let backoff = Duration::from_millis(self.device.retry_backoff_ms);
        let mut last_success: Option<Instant> = None;

        log::info!(
            "Teleop loop started: {} + {} at {} Hz (adaptive_dt={})",
            self.left.name(),
            self.right.name(),
            self.device.sample_rate_hz,
            self.device.adaptive_dt
        );

        while running.load(Ordering::Relaxed) {
            let loop_start = Instant::now();

            let dt = match last_success {
                Some(last) if self.device.adaptive_dt => {
                    let measured = loop_start.duration_since(last).as_secs_f64();
                    if measured > 0.0 { measured } else { nominal }
                }
                _ => nominal,
            };

            let output = match self.tick(dt) {
                Ok(output) => output,
                Err(e) if e.is_transient() => {
                    self.stats.skipped += 1;
                    log::warn!("Read error, skipping tick: {}", e);
                    thread::sleep(backoff);
                    continue;
                }
                Err(Error::InvalidInput(msg)) => {
                    self.stats.skipped += 1;
                    log::warn!("Discarding tick: {}", msg);
                    thread::sleep(backoff);
                    continue;
                }
                Err(e) => {
                    log::error!("Teleop loop failed: {}", e);
                    return Err(e);
                }
            };

            last_success = Some(loop_start);
            self.stats.ticks += 1;

            match tx.try_send(output.packet) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.stats.dropped += 1;
                    log::warn!("Publisher queue full, dropping packet");
                }
                Err(TrySendError::Disconnected(_)) => {
                    log::info!("Publisher gone, stopping teleop loop");
                    break;
                }
            }

            if self.stats.ticks % PROGRESS_INTERVAL == 0 {
                let v_left = self.left_estimator.velocity();
                let v_right = self.right_estimator.velocity();
                log::info!(
                    "{} ticks ({} skipped, {} dropped), |v| L={:.3} R={:.3} m/s",
                    self.stats.ticks,
                    self.stats.skipped,
                    self.stats.dropped,
                    v_left.magnitude(),
                    v_right.magnitude()
                );
            }

            // Sleep for remaining interval
            let elapsed = loop_start.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }

        log::info!(
            "Teleop loop stopped: {} ticks, {} skipped, {} dropped",
            self.stats.ticks,
            self.stats.skipped,
            self.stats.dropped
        );
        Ok(self.stats)
    }

    pub fn left_estimator(&self) -> &VelocityEstimator {
        &self.left_estimator
    }

    pub fn right_estimator(&self) -> &VelocityEstimator {
        &self.right_estimator
    }

    pub fn stats(&self) -> TeleopStats {
        self.stats
    }

    /// Nominal tick interval in seconds
    pub fn tick_secs(&self) -> f64 {
        self.device.tick_secs()
    }
}
