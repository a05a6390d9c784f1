//! Core engine types: stats, timers, RNG, players, configuration, errors,
//! and lifecycle events.
//!
//! Everything here is independent of any particular unit or session; the
//! unit catalog and the session machine build on these primitives.

pub mod config;
pub mod error;
pub mod event;
pub mod player;
pub mod rng;
pub mod stats;
pub mod timer;

pub use config::{EngineConfig, GameMode, RewardConfig, SessionId, WinPolicy};
pub use error::{EngineError, EngineResult};
pub use event::{EventBuffer, EventSink, LifecycleEvent, SessionSummary};
pub use player::{NullStore, Player, PlayerId, PlayerStore, UnitRecord};
pub use rng::GameRng;
pub use stats::{Stat, Stats};
pub use timer::{Cooldown, Stacker};
