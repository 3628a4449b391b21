//! The dice source.
//!
//! Every random effect in a game (rolling dice, resolving a gamble) draws from
//! a `GameRng` passed into the reducer. Nothing else in the crate is allowed
//! to be nondeterministic, so seeding the `GameRng` makes a whole game or a
//! whole search reproducible.
//!
//! Searches keep two streams: one for their own choices (tie-breaks, random
//! playout moves) and a `fork` for chance inside the game, so a change in how
//! often the search breaks ties does not reshuffle the dice.
//!
//! ```
//! use lookahead::core::GameRng;
//!
//! let mut choices = GameRng::new(42);
//! let mut dice = choices.fork();
//!
//! let a: Vec<u8> = (0..8).map(|_| choices.roll_die(6)).collect();
//! let b: Vec<u8> = (0..8).map(|_| dice.roll_die(6)).collect();
//! assert_ne!(a, b);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used whenever the engine needs to reduce a state speculatively
/// (lookahead chaining, outcome deduplication). Both sides of a comparison
/// see the same dice.
pub const SPECULATIVE_SEED: u64 = 0x5EED_1DEA;

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The fixed-seed source used for speculative reduction.
    #[must_use]
    pub fn speculative() -> Self {
        Self::new(SPECULATIVE_SEED)
    }

    /// Split off an independent stream, seeded from this one.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self::new(self.inner.gen())
    }

    /// Roll one die with faces `1..=sides`.
    pub fn roll_die(&mut self, sides: u8) -> u8 {
        assert!(sides > 0, "a die needs at least one face");
        self.inner.gen_range(1..=sides)
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Uniform pick from `slice`; `None` when it is empty.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}
