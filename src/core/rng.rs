//! Deterministic random number generation for seeded game effects.
//!
//! The rules core never draws from an ambient random source. Any effect that
//! needs a random outcome (burning a card during a rally) takes an explicit
//! seed, builds a `GameRng` from it, and records both the seed and the outcome
//! in the event. Replaying the event log therefore never resamples.
//!
//! ```
//! use commander_rules::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//!
//! assert_eq!(a.gen_range_usize(0..100), b.gen_range_usize(0..100));
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG seeded per event.
///
/// Uses ChaCha8, whose output for a given seed is stable across platforms
/// and crate versions.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produce a fresh seed for the next seeded event.
    ///
    /// Orchestrators keep one `GameRng` per game and call this whenever the
    /// oracle asks for a game effect.
    pub fn next_seed(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_next_seed_is_deterministic() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(7);

        let seeds1: Vec<_> = (0..5).map(|_| rng1.next_seed()).collect();
        let seeds2: Vec<_> = (0..5).map(|_| rng2.next_seed()).collect();

        assert_eq!(seeds1, seeds2);
        assert_eq!(rng1.seed(), 7);
    }
}
