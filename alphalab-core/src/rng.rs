//! Deterministic RNG hierarchy.
//!
//! A master seed generates a sub-seed for each `(stream, index)` pair, e.g.
//! `("monte_carlo", path)` or `("frontier", sample)`. Sub-seeds are derived
//! via BLAKE3 hashing, independently of evaluation order, so parallel and
//! sequential runs draw identical numbers.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for `(stream, index)`.
    ///
    /// Calling `sub_seed("a", 0)` then `sub_seed("b", 0)` gives the same
    /// results as the reverse order.
    pub fn sub_seed(&self, stream: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(&(stream.len() as u64).to_le_bytes());
        hasher.update(stream.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(word)
    }

    /// Seeded StdRng for `(stream, index)`.
    pub fn rng_for(&self, stream: &str, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(stream, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn sub_seeds_are_deterministic() {
        let hierarchy = RngHierarchy::new(42);
        assert_eq!(
            hierarchy.sub_seed("monte_carlo", 0),
            hierarchy.sub_seed("monte_carlo", 0)
        );
    }

    #[test]
    fn different_streams_different_seeds() {
        let hierarchy = RngHierarchy::new(42);
        assert_ne!(
            hierarchy.sub_seed("monte_carlo", 0),
            hierarchy.sub_seed("frontier", 0)
        );
    }

    #[test]
    fn different_indices_different_seeds() {
        let hierarchy = RngHierarchy::new(42);
        assert_ne!(
            hierarchy.sub_seed("monte_carlo", 0),
            hierarchy.sub_seed("monte_carlo", 1)
        );
    }

    #[test]
    fn derivation_order_independent() {
        let hierarchy = RngHierarchy::new(42);

        let a_first = hierarchy.sub_seed("a", 7);
        let b_second = hierarchy.sub_seed("b", 7);

        let b_first = hierarchy.sub_seed("b", 7);
        let a_second = hierarchy.sub_seed("a", 7);

        assert_eq!(a_first, a_second);
        assert_eq!(b_first, b_second);
    }

    #[test]
    fn different_master_seeds_different_output() {
        let h1 = RngHierarchy::new(42);
        let h2 = RngHierarchy::new(43);
        assert_ne!(h1.sub_seed("monte_carlo", 0), h2.sub_seed("monte_carlo", 0));
    }

    #[test]
    fn rng_streams_replay() {
        let hierarchy = RngHierarchy::new(7);
        let a: Vec<f64> = (0..5).map(|_| hierarchy.rng_for("x", 3).gen()).collect();
        let mut rng = hierarchy.rng_for("x", 3);
        let first: f64 = rng.gen();
        assert!(a.iter().all(|v| *v == first));
    }
}
