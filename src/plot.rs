//! Velocity recording and SVG plotting.
//!
//! [`VelocityRecorder`] keeps a bounded window of per-side translation and
//! angular velocity. [`render_svg`] draws it as a 2×3 grid: translation X/Y/Z
//! on top (fixed ±1 m/s), angular X/Y/Z below (fixed ±10 rad/s), left hand
//! blue and right hand vermillion.

use crate::core::types::{Timestamped, Vector3};
use crate::error::{Error, Result};
use crate::streaming::TeleopPacket;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use svg::Document;
use svg::node::element::{Group, Line, Polyline, Rectangle, Text};

/// Okabe-Ito palette
mod colors {
    /// Left controller - blue
    pub const LEFT: &str = "#0072B2";
    /// Right controller - vermillion
    pub const RIGHT: &str = "#D55E00";
    pub const GRID: &str = "#DDDDDD";
    pub const AXIS: &str = "#444444";
}

/// Fixed y range of the translation row (m/s)
const TRANSLATION_LIMIT: f64 = 1.0;
/// Fixed y range of the angular row (rad/s)
const ANGULAR_LIMIT: f64 = 10.0;

const PANEL_WIDTH: f64 = 480.0;
const PANEL_HEIGHT: f64 = 400.0;
const MARGIN: f64 = 60.0;
const HEADER: f64 = 50.0;

/// Per-axis statistics of one series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStats {
    /// Mean of absolute values
    pub mean_abs: Vector3,
    /// Population standard deviation
    pub std_dev: Vector3,
}

impl AxisStats {
    fn from_samples(samples: &VecDeque<Timestamped<Vector3>>) -> Self {
        let n = samples.len().max(1) as f64;
        let mut abs_sum = Vector3::ZERO;
        let mut sum = Vector3::ZERO;
        for s in samples {
            abs_sum += Vector3::new(s.data.x.abs(), s.data.y.abs(), s.data.z.abs());
            sum += s.data;
        }
        let mean = sum / n;

        let mut sq = Vector3::ZERO;
        for s in samples {
            let d = s.data - mean;
            sq += Vector3::new(d.x * d.x, d.y * d.y, d.z * d.z);
        }
        let var = sq / n;

        Self {
            mean_abs: abs_sum / n,
            std_dev: Vector3::new(var.x.sqrt(), var.y.sqrt(), var.z.sqrt()),
        }
    }
}

/// Recording statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSummary {
    /// Time of the last sample (s)
    pub duration_secs: f64,
    pub samples: usize,
    /// Samples over duration (0 if the duration is zero)
    pub sample_rate_hz: f64,
    pub left_velocity: AxisStats,
    pub right_velocity: AxisStats,
    pub left_angular: AxisStats,
    pub right_angular: AxisStats,
}

/// Bounded time series of both controllers' motion
#[derive(Debug, Clone)]
pub struct VelocityRecorder {
    max_samples: usize,
    max_gyro_rad_s: f64,
    left_velocity: VecDeque<Timestamped<Vector3>>,
    right_velocity: VecDeque<Timestamped<Vector3>>,
    left_angular: VecDeque<Timestamped<Vector3>>,
    right_angular: VecDeque<Timestamped<Vector3>>,
}

impl VelocityRecorder {
    /// Recorder holding `duration_secs * sample_rate_hz` samples per series.
    ///
    /// `max_gyro_rad_s` converts normalized gyro readings back to rad/s.
    pub fn new(duration_secs: f64, sample_rate_hz: f64, max_gyro_rad_s: f64) -> Result<Self> {
        let capacity = duration_secs * sample_rate_hz;
        if !(capacity.is_finite() && capacity >= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "recording of {}s at {} Hz holds no samples",
                duration_secs, sample_rate_hz
            )));
        }
        if !(max_gyro_rad_s.is_finite() && max_gyro_rad_s > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "max_gyro_rad_s must be positive, got {}",
                max_gyro_rad_s
            )));
        }

        let max_samples = capacity as usize;
        Ok(Self {
            max_samples,
            max_gyro_rad_s,
            left_velocity: VecDeque::new(),
            right_velocity: VecDeque::new(),
            left_angular: VecDeque::new(),
            right_angular: VecDeque::new(),
        })
    }

    /// Append one tick at `t` seconds since the recording started
    pub fn record(&mut self, t: f64, packet: &TeleopPacket) {
        let scale = self.max_gyro_rad_s;
        let max = self.max_samples;
        push_bounded(&mut self.left_velocity, max, Timestamped::new(packet.left_velocity, t));
        push_bounded(&mut self.right_velocity, max, Timestamped::new(packet.right_velocity, t));
        push_bounded(&mut self.left_angular, max, Timestamped::new(packet.left_gyro * scale, t));
        push_bounded(&mut self.right_angular, max, Timestamped::new(packet.right_gyro * scale, t));
    }

    pub fn len(&self) -> usize {
        self.left_velocity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_velocity.is_empty()
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    pub fn left_velocity(&self) -> &VecDeque<Timestamped<Vector3>> {
        &self.left_velocity
    }

    pub fn right_velocity(&self) -> &VecDeque<Timestamped<Vector3>> {
        &self.right_velocity
    }

    /// Left angular velocity (rad/s)
    pub fn left_angular(&self) -> &VecDeque<Timestamped<Vector3>> {
        &self.left_angular
    }

    /// Right angular velocity (rad/s)
    pub fn right_angular(&self) -> &VecDeque<Timestamped<Vector3>> {
        &self.right_angular
    }

    /// Statistics over the recorded window, `None` when empty
    pub fn summary(&self) -> Option<MotionSummary> {
        let last = self.left_velocity.back()?;
        let duration_secs = last.t;
        let samples = self.len();
        let sample_rate_hz = if duration_secs > 0.0 {
            samples as f64 / duration_secs
        } else {
            0.0
        };

        Some(MotionSummary {
            duration_secs,
            samples,
            sample_rate_hz,
            left_velocity: AxisStats::from_samples(&self.left_velocity),
            right_velocity: AxisStats::from_samples(&self.right_velocity),
            left_angular: AxisStats::from_samples(&self.left_angular),
            right_angular: AxisStats::from_samples(&self.right_angular),
        })
    }
}

fn push_bounded<T>(buf: &mut VecDeque<T>, max: usize, value: T) {
    if buf.len() == max {
        buf.pop_front();
    }
    buf.push_back(value);
}

/// One subplot of the grid
struct Panel<'a> {
    title: &'static str,
    unit: &'static str,
    limit: f64,
    axis: fn(&Vector3) -> f64,
    left: &'a VecDeque<Timestamped<Vector3>>,
    right: &'a VecDeque<Timestamped<Vector3>>,
}

fn axis_x(v: &Vector3) -> f64 {
    v.x
}
fn axis_y(v: &Vector3) -> f64 {
    v.y
}
fn axis_z(v: &Vector3) -> f64 {
    v.z
}

/// Build the 2×3 grid document
pub fn render_document(recorder: &VelocityRecorder) -> Result<Document> {
    if recorder.is_empty() {
        return Err(Error::Plot("no data to plot".to_string()));
    }

    let t_end = recorder
        .left_velocity
        .back()
        .map(|s| s.t)
        .unwrap_or(0.0)
        .max(1e-3);

    let panels = [
        Panel {
            title: "X-axis Translation Velocity",
            unit: "Velocity (m/s)",
            limit: TRANSLATION_LIMIT,
            axis: axis_x,
            left: &recorder.left_velocity,
            right: &recorder.right_velocity,
        },
        Panel {
            title: "Y-axis Translation Velocity",
            unit: "Velocity (m/s)",
            limit: TRANSLATION_LIMIT,
            axis: axis_y,
            left: &recorder.left_velocity,
            right: &recorder.right_velocity,
        },
        Panel {
            title: "Z-axis Translation Velocity",
            unit: "Velocity (m/s)",
            limit: TRANSLATION_LIMIT,
            axis: axis_z,
            left: &recorder.left_velocity,
            right: &recorder.right_velocity,
        },
        Panel {
            title: "X-axis Angular Velocity (Roll)",
            unit: "Angular Velocity (rad/s)",
            limit: ANGULAR_LIMIT,
            axis: axis_x,
            left: &recorder.left_angular,
            right: &recorder.right_angular,
        },
        Panel {
            title: "Y-axis Angular Velocity (Pitch)",
            unit: "Angular Velocity (rad/s)",
            limit: ANGULAR_LIMIT,
            axis: axis_y,
            left: &recorder.left_angular,
            right: &recorder.right_angular,
        },
        Panel {
            title: "Z-axis Angular Velocity (Yaw)",
            unit: "Angular Velocity (rad/s)",
            limit: ANGULAR_LIMIT,
            axis: axis_z,
            left: &recorder.left_angular,
            right: &recorder.right_angular,
        },
    ];

    let width = 3.0 * (PANEL_WIDTH + MARGIN) + MARGIN;
    let height = HEADER + 2.0 * (PANEL_HEIGHT + MARGIN) + MARGIN;

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height));

    doc = doc.add(
        Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height)
            .set("fill", "white"),
    );
    doc = doc.add(
        Text::new("Controller Motion Analysis")
            .set("x", width / 2.0)
            .set("y", HEADER - 15.0)
            .set("text-anchor", "middle")
            .set("font-size", 20)
            .set("font-family", "sans-serif")
            .set("fill", "black"),
    );

    for (i, panel) in panels.iter().enumerate() {
        let col = (i % 3) as f64;
        let row = (i / 3) as f64;
        let origin_x = MARGIN + col * (PANEL_WIDTH + MARGIN);
        let origin_y = HEADER + row * (PANEL_HEIGHT + MARGIN);
        doc = doc.add(render_panel(panel, origin_x, origin_y, t_end, row > 0.0));
    }

    Ok(doc)
}

fn render_panel(panel: &Panel, ox: f64, oy: f64, t_end: f64, time_label: bool) -> Group {
    let to_px = |t: f64, v: f64| {
        let v = v.clamp(-panel.limit, panel.limit);
        let px = ox + t / t_end * PANEL_WIDTH;
        let py = oy + (1.0 - (v + panel.limit) / (2.0 * panel.limit)) * PANEL_HEIGHT;
        (px, py)
    };

    let mut group = Group::new().set("class", "panel");

    group = group.add(
        Rectangle::new()
            .set("x", ox)
            .set("y", oy)
            .set("width", PANEL_WIDTH)
            .set("height", PANEL_HEIGHT)
            .set("fill", "none")
            .set("stroke", colors::AXIS)
            .set("stroke-width", 1),
    );

    // Horizontal grid at quarter steps of the range
    for k in 1..8 {
        let v = -panel.limit + k as f64 * panel.limit / 4.0;
        let (_, py) = to_px(0.0, v);
        let (stroke, width) = if k == 4 {
            (colors::AXIS, 0.8)
        } else {
            (colors::GRID, 0.5)
        };
        group = group.add(
            Line::new()
                .set("x1", ox)
                .set("y1", py)
                .set("x2", ox + PANEL_WIDTH)
                .set("y2", py)
                .set("stroke", stroke)
                .set("stroke-width", width),
        );
    }

    for (v, anchor_y) in [(panel.limit, oy + 4.0), (-panel.limit, oy + PANEL_HEIGHT)] {
        group = group.add(
            Text::new(format!("{}", v))
                .set("x", ox - 6.0)
                .set("y", anchor_y)
                .set("text-anchor", "end")
                .set("font-size", 11)
                .set("font-family", "sans-serif")
                .set("fill", "black"),
        );
    }

    group = group.add(
        Text::new(panel.title)
            .set("x", ox + PANEL_WIDTH / 2.0)
            .set("y", oy - 8.0)
            .set("text-anchor", "middle")
            .set("font-size", 14)
            .set("font-family", "sans-serif")
            .set("fill", "black"),
    );
    group = group.add(
        Text::new(panel.unit)
            .set("x", ox + 6.0)
            .set("y", oy + 16.0)
            .set("font-size", 11)
            .set("font-family", "sans-serif")
            .set("fill", colors::AXIS),
    );
    if time_label {
        group = group.add(
            Text::new(format!("Time (s), 0 - {:.1}", t_end))
                .set("x", ox + PANEL_WIDTH / 2.0)
                .set("y", oy + PANEL_HEIGHT + 20.0)
                .set("text-anchor", "middle")
                .set("font-size", 12)
                .set("font-family", "sans-serif")
                .set("fill", "black"),
        );
    }

    for (series, color, label, legend_y) in [
        (panel.left, colors::LEFT, "Left", oy + 16.0),
        (panel.right, colors::RIGHT, "Right", oy + 32.0),
    ] {
        let points: String = series
            .iter()
            .map(|s| {
                let (px, py) = to_px(s.t, (panel.axis)(&s.data));
                format!("{:.2},{:.2}", px, py)
            })
            .collect::<Vec<_>>()
            .join(" ");

        group = group.add(
            Polyline::new()
                .set("points", points)
                .set("fill", "none")
                .set("stroke", color)
                .set("stroke-width", 1.5)
                .set("stroke-opacity", 0.7)
                .set("stroke-linejoin", "round"),
        );

        let legend_x = ox + PANEL_WIDTH - 70.0;
        group = group.add(
            Line::new()
                .set("x1", legend_x)
                .set("y1", legend_y - 4.0)
                .set("x2", legend_x + 20.0)
                .set("y2", legend_y - 4.0)
                .set("stroke", color)
                .set("stroke-width", 2),
        );
        group = group.add(
            Text::new(label)
                .set("x", legend_x + 26.0)
                .set("y", legend_y)
                .set("font-size", 11)
                .set("font-family", "sans-serif")
                .set("fill", "black"),
        );
    }

    group
}

/// Render the recording to an SVG file, creating parent directories
pub fn render_svg<P: AsRef<Path>>(recorder: &VelocityRecorder, path: P) -> Result<()> {
    let doc = render_document(recorder)?;
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    svg::save(path, &doc)?;

    log::info!("Plot saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Battery, ButtonState};
    use crate::streaming::SideState;
    use approx::assert_relative_eq;

    fn packet(left_vx: f64, right_vx: f64, left_gz: f64) -> TeleopPacket {
        let left = SideState {
            stick: (0.0, 0.0),
            buttons: ButtonState::default(),
            accel: Vector3::ZERO,
            gyro: Vector3::new(0.0, 0.0, left_gz),
            velocity: Vector3::new(left_vx, 0.0, 0.0),
            calibrated: true,
            battery: Battery::default(),
        };
        let right = SideState {
            velocity: Vector3::new(right_vx, 0.0, 0.0),
            gyro: Vector3::ZERO,
            ..left
        };
        TeleopPacket::new(0.0, &left, &right)
    }

    #[test]
    fn test_window_is_bounded() {
        let mut recorder = VelocityRecorder::new(0.1, 100.0, 34.9).unwrap();
        assert_eq!(recorder.max_samples(), 10);

        for i in 0..25 {
            recorder.record(i as f64 * 0.01, &packet(i as f64, 0.0, 0.0));
        }

        assert_eq!(recorder.len(), 10);
        assert_eq!(recorder.left_velocity().front().unwrap().data.x, 15.0);
        assert_eq!(recorder.right_angular().len(), 10);
    }

    #[test]
    fn test_gyro_scaled_to_rad_s() {
        let mut recorder = VelocityRecorder::new(1.0, 10.0, 34.9).unwrap();
        recorder.record(0.1, &packet(0.0, 0.0, 0.5));
        assert_relative_eq!(recorder.left_angular()[0].data.z, 17.45, epsilon = 1e-12);
    }

    #[test]
    fn test_long_window_grows_on_demand() {
        let mut recorder = VelocityRecorder::new(1e12, 100.0, 34.9).unwrap();
        assert_eq!(recorder.max_samples(), 100_000_000_000_000);

        recorder.record(0.0, &packet(0.1, 0.1, 0.0));
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_summary_statistics() {
        let mut recorder = VelocityRecorder::new(1.0, 100.0, 34.9).unwrap();
        // Left alternates +0.2 / -0.2, right constant 0.1
        for i in 1..=4 {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            recorder.record(i as f64 * 0.5, &packet(0.2 * sign, 0.1, 0.0));
        }

        let summary = recorder.summary().unwrap();
        assert_eq!(summary.samples, 4);
        assert_relative_eq!(summary.duration_secs, 2.0);
        assert_relative_eq!(summary.sample_rate_hz, 2.0);
        assert_relative_eq!(summary.left_velocity.mean_abs.x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(summary.left_velocity.std_dev.x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(summary.right_velocity.mean_abs.x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(summary.right_velocity.std_dev.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        let recorder = VelocityRecorder::new(1.0, 100.0, 34.9).unwrap();
        assert!(recorder.summary().is_none());
        assert!(matches!(render_document(&recorder), Err(Error::Plot(_))));
    }

    #[test]
    fn test_invalid_window() {
        assert!(VelocityRecorder::new(0.0, 100.0, 34.9).is_err());
        assert!(VelocityRecorder::new(1.0, 100.0, 0.0).is_err());
    }

    #[test]
    fn test_render_svg_file() {
        let mut recorder = VelocityRecorder::new(1.0, 100.0, 34.9).unwrap();
        for i in 0..50 {
            let t = i as f64 * 0.01;
            recorder.record(t, &packet(t.sin(), -t.sin(), 0.1));
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots").join("velocity.svg");
        render_svg(&recorder, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Z-axis Angular Velocity (Yaw)"));
        assert_eq!(content.matches("<polyline").count(), 12);
        assert!(content.contains(colors::LEFT));
        assert!(content.contains(colors::RIGHT));
    }
}
