//! UDP publisher for teleop packets
//!
//! Fire-and-forget unicast to a single fixed destination (by default a
//! consumer on the loopback interface). A failed send is counted and logged;
//! it never stops the sampling loop.
//!
//! # Threading
//!
//! ```text
//! ┌──────────────┐   crossbeam channel   ┌───────────────┐   UDP
//! │ Teleop loop  │ ────────────────────▶ │ UdpPublisher  │ ──────▶ consumer
//! │ (sampler)    │    TeleopPacket       │ (udp-publisher)│
//! └──────────────┘                       └───────────────┘
//! ```
//!
//! The publisher can also be driven directly with [`UdpPublisher::send`]
//! when no separate thread is wanted.
//!
//! # Performance Characteristics
//!
//! - **One datagram per packet**: No framing, no batching
//! - **Bounded queue**: A full queue drops the newest packet on the sampler side
//! - **Graceful degradation**: Send errors are logged but never block

use crate::error::Result;
use crate::streaming::packet::TeleopPacket;
use crate::streaming::wire::{Serializer, WireFormat, create_serializer};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Expected upper bound for one serialized packet
const MAX_UDP_BUFFER_SIZE: usize = 4096;

/// How long the publisher thread waits for a packet before re-checking the
/// running flag
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Send counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublisherStats {
    pub sent: u64,
    pub failed: u64,
}

/// UDP publisher that streams teleop packets to one destination
pub struct UdpPublisher {
    socket: UdpSocket,
    dest: SocketAddr,
    serializer: Serializer,
    stats: PublisherStats,
}

impl UdpPublisher {
    /// Create a publisher on an existing socket
    pub fn new(socket: UdpSocket, dest: SocketAddr, serializer: Serializer) -> Self {
        Self {
            socket,
            dest,
            serializer,
            stats: PublisherStats::default(),
        }
    }

    /// Bind an ephemeral local port suited to `dest` and create a publisher
    pub fn bind(dest: SocketAddr, format: WireFormat) -> Result<Self> {
        let local = if dest.ip().is_loopback() {
            "127.0.0.1:0"
        } else if dest.is_ipv6() {
            "[::]:0"
        } else {
            "0.0.0.0:0"
        };
        let socket = UdpSocket::bind(local)?;
        log::info!(
            "UDP publisher bound to {} -> {} ({:?})",
            socket.local_addr()?,
            dest,
            format
        );
        Ok(Self::new(socket, dest, create_serializer(format)))
    }

    /// Destination address
    pub fn dest(&self) -> SocketAddr {
        self.dest
    }

    /// Send counters so far
    pub fn stats(&self) -> PublisherStats {
        self.stats
    }

    /// Serialize and send one packet
    pub fn send(&mut self, packet: &TeleopPacket) -> Result<()> {
        let payload = self.serializer.serialize(packet)?;
        if payload.len() > MAX_UDP_BUFFER_SIZE {
            log::warn!("Packet of {} bytes exceeds expected size", payload.len());
        }

        match self.socket.send_to(&payload, self.dest) {
            Ok(_) => {
                self.stats.sent += 1;
                Ok(())
            }
            Err(e) => {
                self.stats.failed += 1;
                Err(e.into())
            }
        }
    }

    /// Drain `rx` and send until `running` is cleared or the sender hangs up
    pub fn run(&mut self, rx: Receiver<TeleopPacket>, running: Arc<AtomicBool>) -> Result<()> {
        log::info!("UDP publisher started (unicast to {})", self.dest);

        while running.load(Ordering::Relaxed) {
            match rx.recv_timeout(RECV_TIMEOUT) {
                Ok(packet) => {
                    if let Err(e) = self.send(&packet) {
                        // UDP send errors are not fatal - just log and continue
                        log::warn!("Failed to send packet to {}: {}", self.dest, e);
                    } else {
                        log::trace!("Sent packet ts={:.3} to {}", packet.ts, self.dest);
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("Packet channel closed");
                    break;
                }
            }
        }

        log::info!(
            "UDP publisher stopped ({} sent, {} failed)",
            self.stats.sent,
            self.stats.failed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Battery, ButtonState, Vector3};
    use crate::streaming::packet::SideState;

    fn packet(ts: f64) -> TeleopPacket {
        let side = SideState {
            stick: (0.0, 0.5),
            buttons: ButtonState::default(),
            accel: Vector3::ZERO,
            gyro: Vector3::ZERO,
            velocity: Vector3::new(0.1, 0.0, 0.0),
            calibrated: true,
            battery: Battery::default(),
        };
        TeleopPacket::new(ts, &side, &side)
    }

    fn receiver() -> UdpSocket {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        socket
    }

    #[test]
    fn test_send_json_datagram() {
        let rx = receiver();
        let mut publisher =
            UdpPublisher::bind(rx.local_addr().unwrap(), WireFormat::Json).unwrap();

        publisher.send(&packet(12.5)).unwrap();

        let mut buf = [0u8; MAX_UDP_BUFFER_SIZE];
        let n = rx.recv(&mut buf).unwrap();
        let decoded: TeleopPacket = serde_json::from_slice(&buf[..n]).unwrap();
        assert_eq!(decoded, packet(12.5));
        assert_eq!(publisher.stats(), PublisherStats { sent: 1, failed: 0 });
    }

    #[test]
    fn test_run_drains_channel() {
        let rx_socket = receiver();
        let dest = rx_socket.local_addr().unwrap();
        let mut publisher = UdpPublisher::bind(dest, WireFormat::Postcard).unwrap();

        let (tx, rx) = crossbeam_channel::bounded(8);
        for i in 0..3 {
            tx.send(packet(i as f64)).unwrap();
        }
        drop(tx);

        publisher.run(rx, Arc::new(AtomicBool::new(true))).unwrap();
        assert_eq!(publisher.stats().sent, 3);

        let serializer = create_serializer(WireFormat::Postcard);
        let mut buf = [0u8; MAX_UDP_BUFFER_SIZE];
        for i in 0..3 {
            let n = rx_socket.recv(&mut buf).unwrap();
            let decoded: TeleopPacket = serializer.deserialize(&buf[..n]).unwrap();
            assert_eq!(decoded.ts, i as f64);
        }
    }

    #[test]
    fn test_run_stops_on_flag() {
        let rx_socket = receiver();
        let mut publisher =
            UdpPublisher::bind(rx_socket.local_addr().unwrap(), WireFormat::Json).unwrap();
        let (_tx, rx) = crossbeam_channel::bounded::<TeleopPacket>(1);

        // Flag already cleared: returns without waiting on the open channel
        publisher.run(rx, Arc::new(AtomicBool::new(false))).unwrap();
        assert_eq!(publisher.stats().sent, 0);
    }
}
