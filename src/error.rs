//! Error types for joymotion

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// joymotion error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sample or tick interval rejected by the estimator
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Device read timed out
    #[error("Device read timeout")]
    Timeout,

    /// Device went away
    #[error("Device disconnected: {0}")]
    DeviceDisconnected(String),

    /// Unknown device type in configuration
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// Plot rendering error
    #[error("Plot error: {0}")]
    Plot(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Whether the driving loop should skip the tick and retry.
    ///
    /// Device timeouts and socket errors are transient; everything else is
    /// either a programming error or a configuration problem.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Timeout | Error::Io(_))
    }
}
