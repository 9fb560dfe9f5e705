//! Deterministic random stream for map rendering
//!
//! A render draws every shape and feature position from one sequential
//! ChaCha8 stream seeded from the caller's integer seed.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub struct MapRng {
    inner: ChaCha8Rng,
}

impl MapRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RngCore for MapRng {
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

/// Helper functions for common random operations
pub trait RngExt {
    /// Uniform real in `[min, max]`. An empty or zero-width range yields `min`.
    fn uniform_f64(&mut self, min: f64, max: f64) -> f64;
}

impl<R: Rng + ?Sized> RngExt for R {
    fn uniform_f64(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.gen::<f64>() * (max - min) + min
    }
}
