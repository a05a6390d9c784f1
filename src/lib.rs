//! # rust-arena
//!
//! A multiplayer turn-based combat engine: players queue by game mode, a
//! matchmaker forms sessions, and members fight with unit skills, stats,
//! buffs, and cooldowns until one side remains.
//!
//! ## Design Principles
//!
//! 1. **Deterministic outcomes**: every random roll (crit, dodge,
//!    Jackpot, rewards) flows through a seedable [`GameRng`], so a fixed
//!    seed reproduces a session exactly.
//!
//! 2. **Tagged-variant catalog**: units, passives, buffs, and skills are
//!    enums dispatched by kind, with all mutable per-member state in the
//!    session's scratch store. The shared catalog is immutable.
//!
//! 3. **No globals**: an [`Engine`] context object owns queues, sessions,
//!    players, and the RNG, and is threaded through every call.
//!
//! 4. **Boundary traits**: persistence ([`PlayerStore`]) and event
//!    delivery ([`EventSink`]) are collaborator traits the engine never
//!    blocks on.
//!
//! ## Modules
//!
//! - `core`: stats, resource timers, RNG, players, config, errors, events
//! - `combat`: the damage event and the fixed resolution pipeline
//! - `modifiers`: timed buffs and debuffs with pipeline hooks
//! - `units`: the static unit catalog, passives, skills, name registry
//! - `game`: sessions, members, turn state machine, rewards
//! - `queue`: per-mode FIFO matchmaking
//! - `engine`: the context object tying it all together

pub mod combat;
pub mod core;
pub mod engine;
pub mod game;
pub mod modifiers;
pub mod queue;
pub mod units;

// Re-export commonly used types
pub use crate::core::{
    Cooldown, EngineConfig, EngineError, EngineResult, EventBuffer, EventSink, GameMode, GameRng,
    LifecycleEvent, NullStore, Player, PlayerId, PlayerStore, RewardConfig, SessionId,
    SessionSummary, Stacker, Stat, Stats, UnitRecord, WinPolicy,
};

pub use crate::combat::DamageEvent;

pub use crate::modifiers::{Buff, BuffKind};

pub use crate::units::{
    skills::SkillKind, UnitEffect, UnitEffectKind, UnitKind, UnitRegistry,
};

pub use crate::game::{
    ActionOutcome, ActionRecord, Game, Member, MemberId, MemberVars, PlayerAction, RewardGrant,
    SessionState, VarValue, BASIC_ATTACK_ENERGY,
};

pub use crate::queue::Matchmaker;

pub use crate::engine::Engine;
