//! Engine configuration: modes, win policy, and reward ranges.
//!
//! The engine hardcodes none of its tunables; the embedder hands an
//! [`EngineConfig`] to [`Engine::new`](crate::engine::Engine::new) at
//! startup. Defaults reproduce the shipped game's numbers.

use serde::{Deserialize, Serialize};

/// Identifier for one open session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session {}", self.0)
    }
}

/// A game-mode definition: required session size and ranked flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Ranked one-on-one.
    Duel,
    /// Unranked three-player free-for-all.
    FreeForAll,
}

impl GameMode {
    /// All defined modes.
    pub const ALL: [GameMode; 2] = [GameMode::Duel, GameMode::FreeForAll];

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Duel => "Duel",
            GameMode::FreeForAll => "Free For All",
        }
    }

    /// Number of members a session of this mode requires.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            GameMode::Duel => 2,
            GameMode::FreeForAll => 3,
        }
    }

    /// Whether sessions of this mode apply end-of-game rewards.
    #[must_use]
    pub fn ranked(&self) -> bool {
        match self {
            GameMode::Duel => true,
            GameMode::FreeForAll => false,
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a session decides it is over.
///
/// An explicit policy parameter: `SoleSurvivor` is the implemented rule for
/// the shipped mode sizes; team-based evaluation would be a new variant
/// rather than a reinterpretation of this one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinPolicy {
    /// The session ends when exactly one living member remains.
    #[default]
    SoleSurvivor,
}

/// Reward tuning for ranked sessions.
///
/// Gem grants are `turn_count / 2` plus a uniform draw from the `_draw`
/// range, clamped into the `_bounds` range; mastery points are a plain
/// uniform draw. All ranges are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Sessions at or below this many turns grant nothing.
    pub min_turns: u32,
    /// Random gem component for the winner.
    pub winner_gem_draw: (i32, i32),
    /// Clamp applied to the winner's total gem grant.
    pub winner_gem_bounds: (i32, i32),
    /// Random gem component for each defeated member.
    pub loser_gem_draw: (i32, i32),
    /// Clamp applied to each defeated member's gem grant.
    pub loser_gem_bounds: (i32, i32),
    /// Mastery points for the winner.
    pub winner_point_draw: (i32, i32),
    /// Mastery points for each defeated member.
    pub loser_point_draw: (i32, i32),
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            min_turns: 7,
            winner_gem_draw: (20, 40),
            winner_gem_bounds: (10, 80),
            loser_gem_draw: (0, 10),
            loser_gem_bounds: (5, 40),
            winner_point_draw: (160, 200),
            loser_point_draw: (80, 100),
        }
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the master RNG; sessions fork deterministic children.
    pub seed: u64,
    /// Modes the matchmaker accepts.
    pub modes: Vec<GameMode>,
    /// Session win evaluation policy.
    pub win_policy: WinPolicy,
    /// Ranked reward tuning.
    pub rewards: RewardConfig,
}

impl EngineConfig {
    /// Configuration with default tuning and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            modes: GameMode::ALL.to_vec(),
            win_policy: WinPolicy::default(),
            rewards: RewardConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
