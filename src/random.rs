//! Uniform random source consumed by the engines.
//!
//! Anything implementing `rand::RngCore` works; tests can also script exact
//! values through their own implementations.

use rand::Rng;
use rand::distributions::Standard;

pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform sample in `[0, limit)`.
    fn below(&mut self, limit: f64) -> f64 {
        self.unit() * limit
    }

    /// `below(limit)` rounded down.
    fn below_floor(&mut self, limit: f64) -> f64 {
        self.below(limit).floor()
    }

    /// Uniform sample in `[lo, hi)`.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.unit() * (hi - lo)
    }

    /// Index in `0..len`; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl<R: rand::RngCore + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f64 {
        self.sample(Standard)
    }
}
