//! Deterministic simulation-level RNG wrapper.
//!
//! # Determinism strategy
//!
//! One `SmallRng` drives every random decision of a run.  The loop is single
//! threaded and visits agents in ascending id order, so the same seed always
//! reproduces the same run.  Successive runs of a host derive their seed with
//! [`SimRng::derive_seed`], mixing the run counter in with the 64-bit fractional
//! golden-ratio constant.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Vec2;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Shared random source for one simulation run.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for the `offset`-th derived stream of `seed`, without consuming
    /// any state.  Used to give each host run its own reproducible seed.
    pub fn derive_seed(seed: u64, offset: u64) -> u64 {
        seed ^ offset.wrapping_mul(MIXING_CONSTANT)
    }

    /// Uniform sample in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Uniform point in the unit square.
    #[inline]
    pub fn unit_point(&mut self) -> Vec2 {
        Vec2::new(self.unit(), self.unit())
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice.  Returns `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
