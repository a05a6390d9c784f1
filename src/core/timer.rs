//! Per-skill resource timers: countdowns and bounded accumulators.
//!
//! Both types report their interesting transition exactly once:
//! [`Cooldown::count`] returns `true` only on the tick that reaches zero
//! (for one-shot "ready" notifications), and [`Stacker::stack`] returns
//! `true` only on the call that crosses the limit.

use serde::{Deserialize, Serialize};

/// A turn-based countdown.
///
/// A fresh cooldown starts ready. [`start`](Self::start) arms it to its
/// full duration; the owner calls [`count`](Self::count) exactly once per
/// elapsed turn.
///
/// ```
/// use rust_arena::core::Cooldown;
///
/// let mut cd = Cooldown::new(2);
/// assert!(cd.is_done());
///
/// cd.start();
/// assert!(!cd.is_done());
/// assert!(!cd.count()); // 2 -> 1
/// assert!(cd.count());  // 1 -> 0, the ready edge
/// assert!(!cd.count()); // already done: no-op, no second edge
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    total: u32,
    remaining: u32,
}

impl Cooldown {
    /// Create a ready cooldown with the given total duration.
    #[must_use]
    pub fn new(total: u32) -> Self {
        Self {
            total,
            remaining: 0,
        }
    }

    /// Arm the cooldown to its full duration.
    pub fn start(&mut self) {
        self.remaining = self.total;
    }

    /// Tick down one turn.
    ///
    /// Returns `true` exactly when this call drives `remaining` to zero.
    /// Counting an already-done cooldown is a no-op returning `false`.
    pub fn count(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Whether the cooldown has elapsed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Turns left until ready.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Configured duration.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }
}

/// A bounded counter with an activation edge.
///
/// [`stack`](Self::stack) increments toward `limit` and returns `true`
/// exactly on the call that reaches it. The counter does **not** auto-reset:
/// left alone it stays pinned at the limit (readable via
/// [`is_full`](Self::is_full)) until the owner calls
/// [`reset`](Self::reset). Owners decide whether a pinned stacker counts as
/// an activation on the next hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacker {
    limit: u32,
    current: u32,
}

impl Stacker {
    /// Create an empty stacker with the given limit.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self { limit, current: 0 }
    }

    /// Add one stack.
    ///
    /// Returns `true` only on the call that crosses the limit; further
    /// calls clamp at the limit and return `false`.
    pub fn stack(&mut self) -> bool {
        if self.current >= self.limit {
            return false;
        }
        self.current += 1;
        self.current == self.limit
    }

    /// Re-arm the stacker to zero.
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Whether the stacker sits at its limit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.current >= self.limit
    }

    /// Current stack count.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Configured limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }
}
