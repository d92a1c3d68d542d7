//! Deterministic RNG wrapper used by stochastic composites.
//!
//! # Determinism strategy
//!
//! Every stochastic node owns its own `SmallRng`.  Seeding goes through
//! [`TreeRng::new`] (explicit seed) or [`TreeRng::child`] (derived from a
//! parent RNG with a mixing offset), so a tree built from a fixed root seed
//! reproduces the same child orderings run after run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG owned by a single node or scheduler.
pub struct TreeRng(SmallRng);

impl TreeRng {
    pub fn new(seed: u64) -> Self {
        TreeRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `TreeRng` with a different seed offset, useful for
    /// handing each stochastic node its own stream from one root seed.
    pub fn child(&mut self, offset: u64) -> TreeRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        TreeRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Weighted sampling without replacement.
    ///
    /// Returns a permutation of `0..weights.len()`.  Each step draws a value
    /// in `[0, remaining_total)`, scans the still-unused indices in their
    /// original order accumulating weight, and takes the first index whose
    /// cumulative mass reaches the draw.  The chosen weight is then removed
    /// from the total.  Equal weights reduce to a uniform shuffle.
    ///
    /// Weights must be non-negative.
    pub fn weighted_order(&mut self, weights: &[f32]) -> Vec<usize> {
        let mut total: f64 = weights.iter().map(|&w| f64::from(w)).sum();
        let mut unused: Vec<usize> = (0..weights.len()).collect();
        let mut order = Vec::with_capacity(weights.len());

        while !unused.is_empty() {
            let draw = self.unit() * total;
            let mut subtotal = 0.0;
            // Rounding can leave the draw just past the last cumulative sum.
            let mut selected = unused.len() - 1;
            for (slot, &child) in unused.iter().enumerate() {
                let weight = f64::from(weights[child]);
                if subtotal + weight >= draw {
                    selected = slot;
                    break;
                }
                subtotal += weight;
            }

            let child = unused.remove(selected);
            total -= f64::from(weights[child]);
            order.push(child);
        }
        order
    }
}
