//! Permanent, unit-intrinsic passive effects.
//!
//! An [`Effect`] is the immutable half of a unit's passive: a kind tag and
//! a power parameter. The behavior itself is the set of hook `match` arms
//! in [`passives`](crate::units::passives); any mutable passive state
//! (stack trackers, phase counters, per-turn flags) lives in the owning
//! member's scratch store, never here.

use serde::{Deserialize, Serialize};

use crate::units::constants::*;

/// Passive kinds across the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Warrior: every few attacks deal bonus AttackPower damage.
    Momentum,
    /// Gunslinger: the first attack each turn always crits and adds
    /// bonus AttackPower damage.
    Deadshot,
    /// Duelist: incoming crits lose part of their multiplier.
    Poise,
    /// Berserker: attacks gain bonus damage as health is lost.
    Frenzy,
    /// Phasebreaker: cycling phases, Flare charge, AbilityPower scaling.
    PhaseShift,
}

/// One unit passive: kind plus magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Which passive this is.
    pub kind: EffectKind,
    /// Kind-specific magnitude (usually a stat ratio).
    pub power: f32,
}

impl Effect {
    /// Create an effect.
    #[must_use]
    pub fn new(kind: EffectKind, power: f32) -> Self {
        Self { kind, power }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.kind {
            EffectKind::Momentum => "Momentum",
            EffectKind::Deadshot => "Deadshot",
            EffectKind::Poise => "Poise",
            EffectKind::Frenzy => "Frenzy",
            EffectKind::PhaseShift => "Phase Shift",
        }
    }

    /// Player-facing description.
    #[must_use]
    pub fn description(&self) -> String {
        match self.kind {
            EffectKind::Momentum => format!(
                "Every {} attacks deal {:.0}% Attack Power bonus damage.",
                WARRIOR_PASSIVE_LIMIT,
                self.power * 100.0
            ),
            EffectKind::Deadshot => format!(
                "The first attack each turn always crits and deals {:.0}% Attack Power bonus damage.",
                self.power * 100.0
            ),
            EffectKind::Poise => format!(
                "Incoming crits deal {:.0}% less bonus damage.",
                self.power * 100.0
            ),
            EffectKind::Frenzy => format!(
                "Attacks deal up to {:.0}% bonus damage based on missing health.",
                self.power * 100.0
            ),
            EffectKind::PhaseShift => format!(
                "Attacks deal {:.0}% Ability Power bonus damage. Phase cycles 1-3 every turn; \
                 basic attacks build Flare.",
                self.power * 100.0
            ),
        }
    }
}
