//! UDP streaming module for joymotion

pub mod packet;
pub mod udp_publisher;
pub mod wire;

pub use packet::{SideState, TeleopPacket, unix_timestamp};
pub use udp_publisher::{PublisherStats, UdpPublisher};
pub use wire::{Serializer, WireFormat, create_serializer};
