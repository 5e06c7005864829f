//! Explicit random source threaded through every probabilistic decision.

use crate::config::SpeedRange;
use outbreak_data::{Bounds, Point};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// The world's pseudo-random generator.
///
/// Defaults to `ChaCha8Rng`; tests can wrap any [`RngCore`] (for example
/// `rand::rngs::mock::StepRng`) to pin probabilistic branches.
pub struct SimRng {
    inner: Box<dyn RngCore + Send>,
}

impl fmt::Debug for SimRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimRng").finish_non_exhaustive()
    }
}

impl SimRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Seeded when a seed is configured, otherwise drawn from OS entropy.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    pub fn from_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self {
            inner: Box::new(rng),
        }
    }

    /// Bernoulli trial. Non-positive or NaN probabilities never fire.
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        self.gen_bool(p.min(1.0))
    }

    /// Uniform float in `[lo, hi]`; collapses to `lo` for an empty range.
    pub fn between(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.gen_range(lo..=hi)
        } else {
            lo
        }
    }

    /// `base` plus a uniform offset in `[-jitter, jitter]`, never negative.
    pub fn speed(&mut self, range: SpeedRange) -> f64 {
        let jitter = range.jitter.abs();
        (range.base + self.between(-jitter, jitter)).max(0.0)
    }

    pub fn point_in(&mut self, bounds: Bounds) -> Point {
        Point::new(
            self.between(0.0, bounds.width),
            self.between(0.0, bounds.height),
        )
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
