//! # Randomness capability.
//!
//! [`RandomSource`] is the only thing the facility and the driver need from a
//! random number generator. It is implemented for every [`rand::Rng`], so
//! callers pass `rand::rng()` for live runs or a seeded `StdRng` for
//! reproducible ones.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Uniform picks used by seeding and by the gate driver.
pub trait RandomSource {
    /// Picks one element of `options` uniformly; `None` if `options` is empty.
    fn choose_one_of<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T>;

    /// Uniform integer in `min..=max`. Bounds are swapped if reversed.
    fn int_in_range(&mut self, min: i64, max: i64) -> i64;
}

impl<R: Rng> RandomSource for R {
    fn choose_one_of<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        options.choose(self)
    }

    fn int_in_range(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.random_range(lo..=hi)
    }
}
