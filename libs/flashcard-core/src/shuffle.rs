//! Uniform in-place shuffling.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` in place.
///
/// Uses rand's Fisher-Yates implementation, so every permutation is equally
/// likely given a uniform random source.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
