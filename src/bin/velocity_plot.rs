//! Record both controllers' velocity for a fixed duration and plot it.
//!
//! # Usage
//!
//! ```bash
//! velocity-plot --duration 10 --output output/velocity.svg
//! ```
//!
//! Writes a 2×3 SVG grid (translation X/Y/Z, angular X/Y/Z) and prints
//! per-axis motion statistics.

use clap::Parser;
use joymotion::config::AppConfig;
use joymotion::error::{Error, Result};
use joymotion::plot::{AxisStats, VelocityRecorder, render_svg};
use joymotion::teleop::TeleopLoop;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Samples between progress lines
const PROGRESS_EVERY: usize = 50;

#[derive(Parser)]
#[command(name = "velocity-plot")]
#[command(about = "Record controller velocity and render an SVG plot")]
struct Args {
    /// Configuration file (defaults to ./joymotion.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recording duration in seconds (overrides [plot] duration_secs)
    #[arg(short, long)]
    duration: Option<f64>,

    /// SVG output path (overrides [plot] output)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(duration) = args.duration {
        config.plot.duration_secs = duration;
    }
    config.validate()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.plot.output));
    let duration = config.plot.duration_secs;
    let rate = config.device.sample_rate_hz;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let mut teleop = TeleopLoop::from_config(&config)?;
    let mut recorder = VelocityRecorder::new(duration, rate, config.plot.max_gyro_rad_s)?;

    println!("Recording for {:.1} seconds at {} Hz...", duration, rate);
    record(&mut teleop, &mut recorder, &config, &running)?;
    println!("Data collection complete. Collected {} samples.", recorder.len());

    let Some(summary) = recorder.summary() else {
        return Err(Error::Plot("no data to plot".to_string()));
    };

    render_svg(&recorder, &output)?;
    println!("Plot written to {}", output.display());

    println!("\n=== Motion Statistics ===");
    println!("Recording duration: {:.1} seconds", summary.duration_secs);
    println!("Sample count: {}", summary.samples);
    println!("Average sample rate: {:.1} Hz", summary.sample_rate_hz);

    println!("\nTranslation Velocity Statistics (m/s):");
    print_stats("Left ", &summary.left_velocity);
    print_stats("Right", &summary.right_velocity);

    println!("\nAngular Velocity Statistics (rad/s):");
    print_stats("Left ", &summary.left_angular);
    print_stats("Right", &summary.right_angular);

    Ok(())
}

/// Tick at the nominal rate until `duration_secs` of wall time has passed
fn record(
    teleop: &mut TeleopLoop,
    recorder: &mut VelocityRecorder,
    config: &AppConfig,
    running: &AtomicBool,
) -> Result<()> {
    let dt = teleop.tick_secs();
    let interval = config.device.tick_interval()?;
    let backoff = Duration::from_millis(config.device.retry_backoff_ms);
    let duration = config.plot.duration_secs;
    let start = Instant::now();
    let mut samples = 0usize;

    while running.load(Ordering::Relaxed) {
        let loop_start = Instant::now();
        let t = start.elapsed().as_secs_f64();
        if t >= duration {
            break;
        }

        match teleop.tick(dt) {
            Ok(output) => {
                recorder.record(t, &output.packet);
                samples += 1;
                if samples % PROGRESS_EVERY == 0 {
                    log::info!(
                        "Progress: {:.1}% ({:.1}s/{}s)",
                        t / duration * 100.0,
                        t,
                        duration
                    );
                }
            }
            Err(e) => {
                log::warn!("Error during data collection: {}", e);
                thread::sleep(backoff);
                continue;
            }
        }

        let elapsed = loop_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
    Ok(())
}

fn print_stats(label: &str, stats: &AxisStats) {
    println!(
        "{} - X: {:.3}±{:.3}, Y: {:.3}±{:.3}, Z: {:.3}±{:.3}",
        label,
        stats.mean_abs.x,
        stats.std_dev.x,
        stats.mean_abs.y,
        stats.std_dev.y,
        stats.mean_abs.z,
        stats.std_dev.z
    );
}
