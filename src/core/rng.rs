//! Deterministic random number generation for combat and reward rolls.
//!
//! Every random outcome in the engine (crit, dodge, Jackpot, target
//! selection, reward draws) goes through a [`GameRng`] so that a fixed
//! seed reproduces a whole session exactly. The engine owns one master RNG
//! and forks an independent child for each session it creates, so sessions
//! stay deterministic regardless of how many others run beside them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable RNG with deterministic forking.
///
/// ChaCha8 keeps draws fast while staying identical across platforms.
///
/// ```
/// use rust_arena::core::GameRng;
///
/// let mut a = GameRng::new(42);
/// let mut b = GameRng::new(42);
/// assert_eq!(a.between(0, 100), b.between(0, 100));
///
/// // Forks are deterministic too: the same parent state yields the same
/// // child sequence.
/// let mut child_a = a.fork();
/// let mut child_b = b.fork();
/// assert_eq!(child_a.between(0, 100), child_b.between(0, 100));
/// ```
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent child RNG.
    ///
    /// Each fork from the same parent produces a different but
    /// deterministic sequence; the engine forks one child per session.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let child_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(child_seed)
    }

    /// Draw a uniform value in `[0, 1)`.
    pub fn roll(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Test a probability.
    ///
    /// Consumes no draw when `p <= 0` or `p >= 1`, so rolls against absent
    /// stats leave the sequence untouched.
    pub fn chance(&mut self, p: f32) -> bool {
        if p <= 0.0 {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.roll() < p
        }
    }

    /// Draw a uniform integer in the inclusive range `[lo, hi]`.
    pub fn between(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// Pick a uniform element of a slice, `None` if empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let index = self.inner.gen_range(0..items.len());
            items.get(index)
        }
    }
}
