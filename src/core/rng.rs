//! Seeded random streams.
//!
//! Every consumer of randomness owns its own [`GameRng`]: the live match,
//! each facade's rules instance and each agent. Child streams come from
//! [`GameRng::fork`], so a lookahead never advances the match's sequence
//! and a whole trial replays from one seed.
//!
//! ```
//! use splendor_arena::core::GameRng;
//!
//! let mut live = GameRng::new(42);
//! let mut lookahead = live.fork();
//! assert_ne!(live.below(1000), lookahead.below(1000));
//!
//! let mut again = GameRng::new(42).fork();
//! let mut lookahead2 = GameRng::new(42).fork();
//! assert_eq!(again.below(1000), lookahead2.below(1000));
//! ```

use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Golden-ratio step between sibling fork seeds.
const FORK_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            forks: 0,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Child stream. The n-th fork of a given seed is always the same.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(FORK_STEP)))
    }

    /// Uniform in `[0, n)`; `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.gen()
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    /// `k` distinct indices below `n`, ascending. Asking for more than `n`
    /// yields all of them.
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        let mut picked = index::sample(&mut self.inner, n, k.min(n)).into_vec();
        picked.sort_unstable();
        picked
    }

    /// Index drawn in proportion to `weights`, or `None` when nothing has
    /// positive weight.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut left = self.inner.gen::<f32>() * total;
        for (i, &w) in weights.iter().enumerate().filter(|(_, w)| **w > 0.0) {
            left -= w;
            if left <= 0.0 {
                return Some(i);
            }
        }
        weights.iter().rposition(|&w| w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let xs: Vec<_> = (0..50).map(|_| a.below(1000)).collect();
        let ys: Vec<_> = (0..50).map(|_| b.below(1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_forks() {
        let mut rng = GameRng::new(42);
        let mut child = rng.fork();
        let parent_draws: Vec<_> = (0..10).map(|_| rng.below(1000)).collect();
        let child_draws: Vec<_> = (0..10).map(|_| child.below(1000)).collect();
        assert_ne!(parent_draws, child_draws);

        let mut other = GameRng::new(42);
        assert_eq!(other.fork().seed(), child.seed());
        assert_ne!(other.fork().seed(), child.seed());
    }

    #[test]
    fn test_sample_indices() {
        let mut rng = GameRng::new(7);
        let picked = rng.sample_indices(10, 3);
        assert_eq!(picked.len(), 3);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(picked.iter().all(|&i| i < 10));
        assert_eq!(rng.sample_indices(2, 5), vec![0, 1]);
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = GameRng::new(42);
        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&[0.0, 100.0, 0.0]), Some(1));
        }
        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }
}
