//! Three-component vector for sensor samples and velocities.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};

/// Fixed-shape 3-axis quantity.
///
/// Used for raw acceleration (device units), gravity-corrected acceleration,
/// angular rate and velocity (m/s). Plain `Copy` value: handing one out
/// never aliases internal state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Zero vector.
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True if no component is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Clamp each component to `[-limit, limit]`.
    #[inline]
    pub fn clamp_components(self, limit: f64) -> Self {
        Self::new(
            self.x.clamp(-limit, limit),
            self.y.clamp(-limit, limit),
            self.z.clamp(-limit, limit),
        )
    }

    /// Largest absolute component.
    #[inline]
    pub fn max_abs(&self) -> f64 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Component-wise arithmetic mean.
    ///
    /// Uses a running mean, so a slice of identical samples yields that
    /// sample bit-for-bit. Returns `None` for an empty slice.
    pub fn mean(samples: &[Vector3]) -> Option<Vector3> {
        let (first, rest) = samples.split_first()?;
        let mut mean = *first;
        for (i, &s) in rest.iter().enumerate() {
            let n = (i + 2) as f64;
            mean += (s - mean) / n;
        }
        Some(mean)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    #[inline]
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    #[inline]
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl MulAssign<f64> for Vector3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    #[inline]
    fn div(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(0.5, -1.0, 2.0);

        assert_eq!(a + b, Vector3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vector3::new(0.5, 3.0, 1.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a / 2.0, Vector3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_mean() {
        let samples = [
            Vector3::new(0.0, 0.0, 9.0),
            Vector3::new(0.3, 0.0, 10.0),
            Vector3::new(-0.3, 0.3, 10.4),
        ];
        let mean = Vector3::mean(&samples).unwrap();
        assert_relative_eq!(mean.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(mean.y, 0.1, epsilon = 1e-12);
        assert_relative_eq!(mean.z, 9.8, epsilon = 1e-12);

        assert!(Vector3::mean(&[]).is_none());
    }

    #[test]
    fn test_mean_of_identical_is_exact() {
        let g = Vector3::new(0.1, -0.7, 9.8);
        assert_eq!(Vector3::mean(&[g, g, g]), Some(g));
        assert_eq!(Vector3::mean(&[g; 7]), Some(g));
    }

    #[test]
    fn test_clamp_components() {
        let v = Vector3::new(3.0, -5.0, 0.5).clamp_components(2.0);
        assert_eq!(v, Vector3::new(2.0, -2.0, 0.5));
        assert_eq!(v.max_abs(), 2.0);
    }

    #[test]
    fn test_is_finite() {
        assert!(Vector3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Vector3::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Vector3::new(0.0, f64::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_magnitude() {
        assert_relative_eq!(Vector3::new(3.0, 4.0, 0.0).magnitude(), 5.0);
    }
}
