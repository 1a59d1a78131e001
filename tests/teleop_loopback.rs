//! End-to-end loopback tests
//!
//! Mock controllers → TeleopLoop → UdpPublisher → UDP socket on 127.0.0.1,
//! decoding what arrives the way an external consumer would.
//!
//! Run with: `cargo test --test teleop_loopback`

use approx::assert_relative_eq;
use joymotion::config::AppConfig;
use joymotion::devices::mock::SimulationConfig;
use joymotion::streaming::{TeleopPacket, UdpPublisher, WireFormat, create_serializer};
use joymotion::teleop::TeleopLoop;
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

fn consumer() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    socket
}

fn fast_config(simulation: SimulationConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.device.simulation = simulation;
    config.device.sample_rate_hz = 500.0;
    config.device.retry_backoff_ms = 1;
    config
}

#[test]
fn test_json_packets_reach_consumer() {
    let socket = consumer();
    let config = fast_config(SimulationConfig::stationary());
    let mut teleop = TeleopLoop::from_config(&config).unwrap();
    let mut publisher =
        UdpPublisher::bind(socket.local_addr().unwrap(), WireFormat::Json).unwrap();

    for _ in 0..5 {
        let out = teleop.tick(teleop.tick_secs()).unwrap();
        publisher.send(&out.packet).unwrap();
    }

    let mut buf = [0u8; 4096];
    let mut received = Vec::new();
    for _ in 0..5 {
        let n = socket.recv(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf[..n]).unwrap();
        received.push(value);
    }

    // Consumers key on these names
    for key in [
        "ts",
        "lx",
        "ly",
        "rx",
        "ry",
        "left_buttons",
        "right_buttons",
        "left_accel",
        "right_accel",
        "left_gyro",
        "right_gyro",
        "left_velocity",
        "right_velocity",
        "left_calibrated",
        "right_calibrated",
        "left_battery",
        "right_battery",
    ] {
        assert!(received[0].get(key).is_some(), "missing field {}", key);
    }

    assert_eq!(received[1]["left_calibrated"], false);
    assert_eq!(received[2]["left_calibrated"], true);
    assert_eq!(received[4]["right_calibrated"], true);
    assert_eq!(received[4]["left_velocity"]["x"], 0.0);
    assert_eq!(received[4]["right_battery"]["level"], 4);
    assert!(received[4]["ts"].as_f64().unwrap() >= received[0]["ts"].as_f64().unwrap());
}

#[test]
fn test_threaded_pipeline_postcard() {
    let socket = consumer();
    let mut config = fast_config(SimulationConfig {
        settle_secs: 0.0,
        ..SimulationConfig::default()
    });
    config.streaming.wire_format = WireFormat::Postcard;

    let running = Arc::new(AtomicBool::new(true));
    let (tx, rx) = crossbeam_channel::bounded(config.streaming.queue_capacity);

    let mut publisher =
        UdpPublisher::bind(socket.local_addr().unwrap(), config.streaming.wire_format).unwrap();
    let udp_running = Arc::clone(&running);
    let publisher_handle = thread::spawn(move || {
        publisher.run(rx, udp_running).unwrap();
        publisher.stats()
    });

    let loop_running = Arc::clone(&running);
    let loop_config = config.clone();
    let loop_handle = thread::spawn(move || {
        let mut teleop = TeleopLoop::from_config(&loop_config).unwrap();
        teleop.run(&tx, &loop_running).unwrap()
    });

    let serializer = create_serializer(WireFormat::Postcard);
    let mut buf = [0u8; 4096];
    let mut packets: Vec<TeleopPacket> = Vec::new();
    while packets.len() < 50 {
        let n = socket.recv(&mut buf).unwrap();
        packets.push(serializer.deserialize(&buf[..n]).unwrap());
    }

    running.store(false, Ordering::Relaxed);
    let loop_stats = loop_handle.join().unwrap();
    let publisher_stats = publisher_handle.join().unwrap();

    assert!(loop_stats.ticks >= 50);
    assert!(publisher_stats.sent >= 50);
    assert_eq!(publisher_stats.failed, 0);

    for packet in &packets {
        assert!(packet.left_velocity.max_abs() <= 2.0);
        assert!(packet.right_velocity.max_abs() <= 2.0);
        assert!(packet.left_accel.max_abs() <= 1.0);
        assert!(packet.lx.abs() <= 1.0 && packet.ry.abs() <= 1.0);
    }
    assert!(packets[10].left_calibrated && packets[10].right_calibrated);
    // Moving from the first tick, so the trigger is held throughout
    assert!(packets[10].left_buttons.zl);
    assert!(packets[10].right_buttons.zr);
}

#[test]
fn test_dropout_skips_ticks_but_keeps_streaming() {
    let socket = consumer();
    let config = fast_config(SimulationConfig {
        dropout_probability: 0.2,
        ..SimulationConfig::stationary()
    });

    let running = Arc::new(AtomicBool::new(true));
    let (tx, rx) = crossbeam_channel::bounded(64);
    let mut publisher =
        UdpPublisher::bind(socket.local_addr().unwrap(), WireFormat::Json).unwrap();
    let udp_running = Arc::clone(&running);
    let publisher_handle = thread::spawn(move || publisher.run(rx, udp_running));

    let loop_running = Arc::clone(&running);
    let loop_handle = thread::spawn(move || {
        let mut teleop = TeleopLoop::from_config(&config).unwrap();
        teleop.run(&tx, &loop_running).unwrap()
    });

    let mut buf = [0u8; 4096];
    let mut last = None;
    for _ in 0..40 {
        let n = socket.recv(&mut buf).unwrap();
        last = Some(serde_json::from_slice::<TeleopPacket>(&buf[..n]).unwrap());
    }

    running.store(false, Ordering::Relaxed);
    let stats = loop_handle.join().unwrap();
    publisher_handle.join().unwrap().unwrap();

    assert!(stats.skipped > 0);
    // Stationary: skipped ticks never disturb the estimate
    let last = last.unwrap();
    assert_eq!(last.left_velocity.magnitude(), 0.0);
    assert_relative_eq!(last.left_accel.z, 4096.0 / 6000.0, epsilon = 1e-12);
}
