//! The static unit catalog.
//!
//! Units are tagged variants: a [`UnitKind`] enum carrying base-stat
//! literals, one permanent passive [`Effect`](crate::units::effect::Effect)
//! each, and a skill list. All per-member mutable passive state (phase
//! counters, stack trackers, per-turn flags) lives in the session's
//! [`MemberVars`](crate::game::member::MemberVars); the catalog itself is
//! immutable and shared by every session.

pub mod effect;
pub mod passives;
pub mod registry;
pub mod skills;

use serde::{Deserialize, Serialize};

use crate::core::{Stat, Stats};

use effect::{Effect, EffectKind};
use skills::SkillKind;

pub use effect::{Effect as UnitEffect, EffectKind as UnitEffectKind};
pub use registry::UnitRegistry;

/// Tuning constants for the shipped roster.
///
/// Ratios are fractions of the named stat; `_VAR_` constants name slots in
/// the per-member scratch store.
pub mod constants {
    /// Attacks needed to trigger Momentum.
    pub const WARRIOR_PASSIVE_LIMIT: u32 = 3;
    /// AttackPower fraction dealt as Momentum bonus damage.
    pub const WARRIOR_PASSIVE_AP_RATIO: f32 = 0.4;
    pub const WARRIOR_BASH_AP_RATIO: f32 = 0.6;
    pub const WARRIOR_BASH_SP_RATIO: f32 = 0.4;
    pub const WARRIOR_VAR_MOMENTUM: &str = "Momentum";

    /// AttackPower fraction added by Deadshot's forced crit.
    pub const GUNSLINGER_PASSIVE_AP_RATIO: f32 = 0.25;
    pub const GUNSLINGER_BARRAGE_SHOTS: u32 = 4;
    pub const GUNSLINGER_BARRAGE_DAMAGE: f32 = 4.0;
    pub const GUNSLINGER_BARRAGE_AP_RATIO: f32 = 0.25;
    pub const GUNSLINGER_BARRAGE_SP_RATIO: f32 = 0.25;
    pub const GUNSLINGER_ROLL_DODGE: f32 = 0.4;
    pub const GUNSLINGER_ROLL_SP_RATIO: f32 = 0.005;
    pub const GUNSLINGER_ROLL_TURNS: u32 = 2;
    pub const GUNSLINGER_DEADEYE_DAMAGE: f32 = 70.0;
    pub const GUNSLINGER_DEADEYE_AP_RATIO: f32 = 0.4;
    /// Base Jackpot probability.
    pub const GUNSLINGER_DEADEYE_CHANCE: f32 = 0.3;
    /// Jackpot probability gained per landed Barrage shot.
    pub const GUNSLINGER_DEADEYE_PER_SHOT: f32 = 0.05;
    /// Fraction of the target's missing health a Jackpot deals.
    pub const GUNSLINGER_DEADEYE_JACKPOT_RATIO: f32 = 0.5;
    pub const GUNSLINGER_VAR_FIRST_ATTACKED: &str = "first_attacked";
    pub const GUNSLINGER_VAR_BARRAGE_COUNT: &str = "barrage_count";

    /// Crit-multiplier reduction granted by Poise.
    pub const DUELIST_POISE_POWER: f32 = 0.3;
    pub const DUELIST_DISARM_AP_RATIO: f32 = 1.2;
    /// Stored duration; ticks at the holder's turn start, so this blocks
    /// exactly one turn.
    pub const DUELIST_DISARM_TURNS: u32 = 2;

    /// Peak Frenzy bonus (at zero health) as a fraction of base damage.
    pub const BERSERKER_FRENZY_POWER: f32 = 0.5;
    /// AttackPower fraction granted per Rage stack.
    pub const BERSERKER_RAGE_AP_RATIO: f32 = 0.3;
    /// Outlives the 3-turn cooldown so consecutive casts can stack.
    pub const BERSERKER_RAGE_TURNS: u32 = 4;

    /// AbilityPower fraction added to every Phasebreaker hit.
    pub const PHASEBREAKER_PASSIVE_AP_RATIO: f32 = 0.3;
    pub const PHASEBREAKER_FLARE_STACKS: u32 = 3;
    /// Permanent AbilityPower gained per basic attack in a flared Phase 1.
    pub const PHASEBREAKER_PHASE_1_AP: f32 = 7.0;
    /// Base fraction of damage dealt returned as shield in Phase 2.
    pub const PHASEBREAKER_PHASE_2_SHIELD: f32 = 0.6;
    /// AbilityPower per extra percent of Phase 2 shielding.
    pub const PHASEBREAKER_PHASE_2_AP: f32 = 10.0;
    /// Stored duration so the charge covers the owner's next turn.
    pub const PHASEBREAKER_FLARE_TURNS: u32 = 2;
    pub const PHASEBREAKER_VAR_PHASE: &str = "phase";
    pub const PHASEBREAKER_VAR_FLARE: &str = "Flare";
}

/// The playable roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Warrior,
    Gunslinger,
    Duelist,
    Berserker,
    Phasebreaker,
}

impl UnitKind {
    /// Every playable unit, in catalog order.
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Warrior,
        UnitKind::Gunslinger,
        UnitKind::Duelist,
        UnitKind::Berserker,
        UnitKind::Phasebreaker,
    ];

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Warrior => "Warrior",
            UnitKind::Gunslinger => "Gunslinger",
            UnitKind::Duelist => "Duelist",
            UnitKind::Berserker => "Berserker",
            UnitKind::Phasebreaker => "Phasebreaker",
        }
    }

    /// Base stat table members spawn with.
    ///
    /// Every unit carries `CritDamage 0.5` as the base crit bonus and
    /// regains 25 energy per turn.
    #[must_use]
    pub fn base_stats(&self) -> Stats {
        let common = Stats::new()
            .with(Stat::CritDamage, 0.5)
            .with(Stat::EnergyPerTurn, 25.0);
        match self {
            UnitKind::Warrior => common
                .with(Stat::MaxHealth, 775.0)
                .with(Stat::AttackPower, 22.0)
                .with(Stat::MaxEnergy, 125.0)
                .with(Stat::HealthPerTurn, 12.0),
            UnitKind::Gunslinger => common
                .with(Stat::MaxHealth, 1090.0)
                .with(Stat::AttackPower, 19.0)
                .with(Stat::MaxEnergy, 125.0)
                .with(Stat::HealthPerTurn, 12.0),
            UnitKind::Duelist => common
                .with(Stat::MaxHealth, 750.0)
                .with(Stat::AttackPower, 21.0)
                .with(Stat::MaxEnergy, 125.0)
                .with(Stat::HealthPerTurn, 10.0)
                .with(Stat::CritChance, 0.15),
            UnitKind::Berserker => common
                .with(Stat::MaxHealth, 760.0)
                .with(Stat::AttackPower, 19.0)
                .with(Stat::MaxEnergy, 100.0)
                .with(Stat::HealthPerTurn, 10.0)
                .with(Stat::LifeSteal, 0.1),
            UnitKind::Phasebreaker => common
                .with(Stat::MaxHealth, 750.0)
                .with(Stat::AttackPower, 20.0)
                .with(Stat::MaxEnergy, 125.0)
                .with(Stat::HealthPerTurn, 12.0),
        }
    }

    /// The unit's permanent passive.
    #[must_use]
    pub fn passive(&self) -> Effect {
        match self {
            UnitKind::Warrior => Effect::new(
                EffectKind::Momentum,
                constants::WARRIOR_PASSIVE_AP_RATIO,
            ),
            UnitKind::Gunslinger => Effect::new(
                EffectKind::Deadshot,
                constants::GUNSLINGER_PASSIVE_AP_RATIO,
            ),
            UnitKind::Duelist => Effect::new(EffectKind::Poise, constants::DUELIST_POISE_POWER),
            UnitKind::Berserker => {
                Effect::new(EffectKind::Frenzy, constants::BERSERKER_FRENZY_POWER)
            }
            UnitKind::Phasebreaker => Effect::new(
                EffectKind::PhaseShift,
                constants::PHASEBREAKER_PASSIVE_AP_RATIO,
            ),
        }
    }

    /// The unit's active skills.
    #[must_use]
    pub fn skills(&self) -> &'static [SkillKind] {
        match self {
            UnitKind::Warrior => &[SkillKind::Bash],
            UnitKind::Gunslinger => &[SkillKind::Barrage, SkillKind::Roll, SkillKind::Deadeye],
            UnitKind::Duelist => &[SkillKind::Disarm],
            UnitKind::Berserker => &[SkillKind::Rage],
            UnitKind::Phasebreaker => &[SkillKind::Flare],
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
