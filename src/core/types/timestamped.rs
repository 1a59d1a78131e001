//! Generic timestamp wrapper.

use serde::{Deserialize, Serialize};

/// Generic timestamp wrapper for any data type.
///
/// Timestamps are seconds relative to the start of a recording session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timestamped<T> {
    /// The wrapped data
    pub data: T,
    /// Seconds since session start
    pub t: f64,
}

impl<T> Timestamped<T> {
    /// Create a new timestamped value.
    #[inline]
    pub fn new(data: T, t: f64) -> Self {
        Self { data, t }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_json() {
        let ts = Timestamped::new(21.0f64, 0.5);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, r#"{"data":21.0,"t":0.5}"#);
    }
}
