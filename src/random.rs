//! Seedable random source shared by the fallback strategies

use std::ops::Range;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Thread-safe random number source; a fixed seed gives repeatable output
#[derive(Debug)]
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::rng().random())
    }

    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// Uniform sample from `range`; an empty range yields its start
    pub fn uniform(&self, range: Range<f64>) -> f64 {
        if range.is_empty() {
            return range.start;
        }
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(range)
    }

    /// Uniform sample from `[-magnitude, magnitude)`
    pub fn jitter(&self, magnitude: f64) -> f64 {
        let magnitude = magnitude.abs();
        self.uniform(-magnitude..magnitude)
    }

    /// Uniform index below `len`
    pub fn index(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..len)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = RandomSource::seeded(42);
        let b = RandomSource::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.uniform(0.0..1.0), b.uniform(0.0..1.0));
        }
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let random = RandomSource::seeded(7);
        for _ in 0..1000 {
            let value = random.uniform(2.0..3.0);
            assert!((2.0..3.0).contains(&value));
        }
    }

    #[test]
    fn test_jitter_is_bounded() {
        let random = RandomSource::seeded(11);
        for _ in 0..1000 {
            assert!(random.jitter(0.1).abs() <= 0.1);
        }
    }

    #[test]
    fn test_degenerate_ranges() {
        let random = RandomSource::seeded(3);
        assert_eq!(random.uniform(5.0..5.0), 5.0);
        assert_eq!(random.jitter(0.0), 0.0);
        assert_eq!(random.index(0), 0);
        assert_eq!(random.index(1), 0);
    }
}
