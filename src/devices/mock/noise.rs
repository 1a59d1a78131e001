//! Seeded sensor noise for the mock controller
//!
//! Each side draws from its own stream so the two hands never share a noise
//! sequence, while a fixed seed still reproduces a whole session.

use crate::core::types::{ControllerSide, Vector3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Noise source for one simulated controller
pub(super) struct SensorNoise {
    rng: SmallRng,
}

impl SensorNoise {
    /// Seed 0 draws from OS entropy; otherwise the right side uses `seed + 1`.
    pub fn for_side(seed: u64, side: ControllerSide) -> Self {
        let rng = match (seed, side) {
            (0, _) => SmallRng::from_entropy(),
            (s, ControllerSide::Left) => SmallRng::seed_from_u64(s),
            (s, ControllerSide::Right) => SmallRng::seed_from_u64(s.wrapping_add(1)),
        };
        Self { rng }
    }

    fn normal(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f64 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Independent zero-mean Gaussian error on each IMU axis
    pub fn imu(&mut self, stddev: f64) -> Vector3 {
        Vector3::new(self.normal(stddev), self.normal(stddev), self.normal(stddev))
    }

    /// Jitter of one stick axis around its rest position
    pub fn stick_jitter(&mut self, stddev: f64) -> f64 {
        self.normal(stddev)
    }

    /// Whether this read should time out
    pub fn read_drops(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.rng.r#gen::<f64>() < probability
    }
}
