//! Randomness source
//!
//! One `RandomSource` per top-level synthesis call. The engine never shares a
//! generator between calls, so concurrent callers need no locking.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

/// Lowest and highest printable ASCII characters, both inclusive.
pub const PRINTABLE_ASCII: (u8, u8) = (32, 126);

/// Largest day offset applied to "now" for date values.
pub const MAX_DAY_OFFSET: i64 = i16::MAX as i64;

#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        RandomSource {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomSource {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.gen()
    }

    pub fn next_i8(&mut self) -> i8 {
        self.rng.gen()
    }

    pub fn next_i16(&mut self) -> i16 {
        self.rng.gen()
    }

    pub fn next_i64(&mut self) -> i64 {
        self.rng.gen()
    }

    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Integer in the half-open `range`. The caller guarantees it's non-empty.
    pub fn int_in(&mut self, range: Range<i32>) -> i32 {
        self.rng.gen_range(range)
    }

    pub fn printable_char(&mut self) -> char {
        let (low, high) = PRINTABLE_ASCII;
        char::from(self.rng.gen_range(low..=high))
    }

    pub fn printable_string(&mut self, len: usize) -> String {
        (0..len).map(|_| self.printable_char()).collect()
    }

    /// Uniform index below `len`, which must be positive.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Number of days to step back from today, in `0..=MAX_DAY_OFFSET`.
    pub fn day_offset(&mut self) -> i64 {
        self.rng.gen_range(0..=MAX_DAY_OFFSET)
    }

    /// Milliseconds since the epoch within `bounds`.
    pub fn epoch_millis(&mut self, bounds: (i64, i64)) -> i64 {
        self.rng.gen_range(bounds.0..=bounds.1)
    }
}
