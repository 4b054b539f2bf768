use rand::Rng;
use std::f64::consts::PI;

use crate::word_bank::{MAX_WORD_LENGTH, MIN_WORD_LENGTH};

pub const DEFAULT_WORD_LENGTH: usize = 6;

const LENGTH_MEAN: f64 = 6.0;
const LENGTH_STD_DEV: f64 = 1.67;

/// Middle value of three
pub fn median_of_three<T: Ord + Copy>(a: T, b: T, c: T) -> T {
    let mut values = [a, b, c];
    values.sort();
    values[1]
}

/// Clamp a requested length into the playable range
pub fn clamp_length(length: usize) -> usize {
    median_of_three(MIN_WORD_LENGTH, MAX_WORD_LENGTH, length)
}

/// Length for the next round: normally distributed around six letters
/// (Box-Muller), rounded up and clamped into the playable range.
pub fn random_word_length<R: Rng + ?Sized>(rng: &mut R) -> usize {
    // u1 in (0, 1] keeps ln() finite
    let u1: f64 = 1.0 - rng.gen_range(0.0..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    let sampled = (LENGTH_MEAN + LENGTH_STD_DEV * z).ceil();
    // float-to-int casts saturate, negative samples become 0
    clamp_length(sampled as usize)
}
