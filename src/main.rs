//! joymotion - Teleop daemon
//!
//! Samples both controllers at a fixed rate, estimates per-hand velocity and
//! streams one packet per tick over UDP.
//!
//! ```text
//! main thread                     udp-publisher thread
//! ┌─────────────────┐  bounded   ┌─────────────────┐
//! │ TeleopLoop::run │ ─────────▶ │ UdpPublisher    │ ──▶ dest_address
//! └─────────────────┘  channel   └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! joymotion --config joymotion.toml --dest 127.0.0.1:5005 --rate 100
//! ```

use clap::Parser;
use joymotion::config::AppConfig;
use joymotion::error::{Error, Result};
use joymotion::streaming::UdpPublisher;
use joymotion::teleop::TeleopLoop;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[derive(Parser)]
#[command(name = "joymotion")]
#[command(about = "Stream controller motion and velocity estimates over UDP")]
struct Args {
    /// Configuration file (defaults to ./joymotion.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the UDP destination (host:port)
    #[arg(short, long)]
    dest: Option<String>,

    /// Override the sample rate (Hz)
    #[arg(short, long)]
    rate: Option<f64>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(dest) = &args.dest {
        config.streaming.dest_address = dest.clone();
    }
    if let Some(rate) = args.rate {
        config.device.sample_rate_hz = rate;
    }
    config.validate()?;

    // Initialize logger; RUST_LOG overrides the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("joymotion v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Device: {} at {} Hz, streaming {:?} to {}",
        config.device.device_type,
        config.device.sample_rate_hz,
        config.streaming.wire_format,
        config.streaming.dest_address
    );

    let dest = config.streaming.dest()?;
    let mut teleop = TeleopLoop::from_config(&config)?;

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let (tx, rx) = crossbeam_channel::bounded(config.streaming.queue_capacity);

    let mut publisher = UdpPublisher::bind(dest, config.streaming.wire_format)?;
    let udp_running = Arc::clone(&running);
    let udp_handle = thread::Builder::new()
        .name("udp-publisher".to_string())
        .spawn(move || {
            if let Err(e) = publisher.run(rx, udp_running) {
                log::error!("UDP publisher error: {}", e);
            }
            publisher.stats()
        })
        .map_err(|e| Error::Other(format!("Failed to spawn UDP publisher: {}", e)))?;

    log::info!("joymotion running. Press Ctrl-C to stop.");
    let result = teleop.run(&tx, &running);

    // Stop the publisher whether the loop ended cleanly or not
    running.store(false, Ordering::Relaxed);
    drop(tx);
    match udp_handle.join() {
        Ok(stats) => log::info!("Published {} packets ({} failed)", stats.sent, stats.failed),
        Err(_) => log::error!("UDP publisher thread panicked"),
    }

    let stats = result?;
    log::info!(
        "Shutdown complete: {} ticks, {} skipped, {} dropped",
        stats.ticks,
        stats.skipped,
        stats.dropped
    );
    Ok(())
}
