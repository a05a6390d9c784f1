//! Per-mode FIFO matchmaking queues.
//!
//! The [`Matchmaker`] is a plain data structure; the engine wraps it in a
//! single lock because a refresh both reads and structurally mutates
//! several queues at once. A player waits in at most one queue, and only
//! while not assigned to a session (the engine enforces the session half).

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::core::{EngineError, EngineResult, GameMode, PlayerId};

/// Per-mode FIFO waiting lists.
#[derive(Clone, Debug, Default)]
pub struct Matchmaker {
    queues: FxHashMap<GameMode, VecDeque<PlayerId>>,
}

impl Matchmaker {
    /// Create an empty matchmaker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player to a mode's queue.
    ///
    /// Rejected with [`EngineError::AlreadyQueued`] if the player waits in
    /// any queue.
    pub fn enqueue(&mut self, player: PlayerId, mode: GameMode) -> EngineResult<()> {
        if self.is_queued(player) {
            return Err(EngineError::AlreadyQueued);
        }
        self.queues.entry(mode).or_default().push_back(player);
        Ok(())
    }

    /// Remove a player from whatever queue holds them.
    ///
    /// Returns whether the player was waiting. Has no effect once the
    /// player has been matched out of the queue.
    pub fn dequeue(&mut self, player: PlayerId) -> bool {
        for queue in self.queues.values_mut() {
            if let Some(pos) = queue.iter().position(|&p| p == player) {
                queue.remove(pos);
                return true;
            }
        }
        false
    }

    /// Whether a player is waiting in any queue.
    #[must_use]
    pub fn is_queued(&self, player: PlayerId) -> bool {
        self.queues.values().any(|q| q.contains(&player))
    }

    /// Number of players waiting for a mode.
    #[must_use]
    pub fn queue_len(&self, mode: GameMode) -> usize {
        self.queues.get(&mode).map_or(0, VecDeque::len)
    }

    /// One refresh tick: form at most one full group per mode.
    ///
    /// Each mode's queue is scanned in FIFO order; if it holds at least
    /// `mode.size()` players, the first `size` are removed (preserving the
    /// remainder's order) and returned as a match. The scan for that mode
    /// then stops.
    pub fn take_matches(&mut self) -> Vec<(GameMode, Vec<PlayerId>)> {
        let mut matches = Vec::new();
        let mut modes: Vec<GameMode> = self.queues.keys().copied().collect();
        // Queue-map iteration order is arbitrary; fix it for determinism.
        modes.sort_by_key(|m| m.name());

        for mode in modes {
            let queue = match self.queues.get_mut(&mode) {
                Some(q) => q,
                None => continue,
            };
            let size = mode.size();
            if queue.len() >= size {
                let group: Vec<PlayerId> = queue.drain(..size).collect();
                matches.push((mode, group));
            }
        }
        matches
    }
}
