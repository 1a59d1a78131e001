//! Wire format serialization abstraction
//!
//! Each UDP datagram carries exactly one serialized packet. Datagrams are
//! self-delimiting, so there is no length prefix.
//!
//! ## Wire Formats
//!
//! ### JSON (Default)
//! - **Pros**: Human-readable, easy to debug, any consumer can parse it
//! - **Cons**: Larger message size (~1.2 KB per teleop packet)
//! - **Use case**: Plotting tools, scripting-language consumers
//!
//! ### Postcard (Binary)
//! - **Pros**: Compact (~150 bytes per teleop packet), fast
//! - **Cons**: Binary format, consumer must share the Rust types
//! - **Use case**: Rust teleoperation consumers
//!
//! ## Error Handling
//!
//! - **Serialization failure**: Packet skipped, error logged by the caller
//! - **Deserialization failure**: Returned to the caller as
//!   [`Error::Serialization`]

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Binary format using postcard - fast and compact
    Postcard,
    /// JSON format - human-readable for debugging
    #[default]
    Json,
}

/// Serializer that can handle both formats
#[derive(Debug, Clone)]
pub struct Serializer {
    format: WireFormat,
}

impl Serializer {
    /// Create a new serializer for the given format
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// Serialize a message to bytes
    pub fn serialize<T: Serialize>(&self, msg: &T) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::Postcard => {
                postcard::to_allocvec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::to_vec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }

    /// Deserialize bytes to a message
    pub fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self.format {
            WireFormat::Postcard => {
                postcard::from_bytes(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }
}

/// Create a serializer for the given wire format
pub fn create_serializer(format: WireFormat) -> Serializer {
    Serializer::new(format)
}
