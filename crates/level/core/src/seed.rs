//! Deterministic seed source for level generation.
//!
//! Every random decision made while building a level (room counts, parents,
//! categories, archetypes, door order, rewards) is drawn from a [`SeedSource`].
//! Given the same seed and the same call sequence, the produced values are
//! bit-for-bit identical across runs and platforms.
//!
//! # Determinism
//!
//! The stream is a ChaCha8 generator seeded through `SeedableRng::seed_from_u64`,
//! whose output is specified independently of platform word size. Degenerate
//! ranges never panic: they return their lower bound.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reproducible pseudo-random stream wrapping an integer seed.
#[derive(Clone, Debug)]
pub struct SeedSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeedSource {
    /// Creates a source that replays the stream identified by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source from a freshly drawn seed.
    ///
    /// The chosen seed is available through [`SeedSource::seed`] so the level
    /// can be reproduced later.
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    /// The seed this source was constructed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reinitializes the stream so subsequent draws replay the original sequence.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Returns an independent source for a numbered sub-stream of this seed.
    ///
    /// Derivation depends only on the original seed and `stream`, never on how
    /// many values have already been drawn from `self`.
    pub fn derive(&self, stream: u64) -> Self {
        Self::new(mix_stream(self.seed, stream))
    }

    /// Integer in `[0, max)`; returns 0 when `max` is 0.
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }

    /// Integer in `[min, max)`; returns `min` when the range is empty.
    pub fn next_int_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Index in `[0, len)`; returns 0 for an empty collection.
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Float in `[0, 1)`.
    pub fn next_float(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    /// Float in `[min, max)`; returns `min` when the range is empty.
    pub fn next_float_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + (max - min) * self.next_float()
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.r#gen::<bool>()
    }

    /// Returns true with the given probability (clamped to `[0, 1]`).
    pub fn chance(&mut self, probability: f32) -> bool {
        self.next_float() < probability.clamp(0.0, 1.0)
    }

    /// Shuffles `items` in place using this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

fn mix_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}
