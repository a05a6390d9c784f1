//! Buff kinds, instances, and their damage-pipeline hooks.
//!
//! A [`Buff`] is a timed, sourced modifier held by a member in insertion
//! order. Buffs contribute stats (merged by [`Member::stats`]) and may hook
//! the damage pipeline exactly like unit passives. Re-applying a kind a
//! member already carries refreshes it in place; stackable kinds also gain
//! a stack.
//!
//! Hook dispatch is a `match` on [`BuffKind`]; a kind without a given hook
//! simply falls through; hooks are total and never fail.
//!
//! [`Member::stats`]: crate::game::member::Member::stats

use serde::{Deserialize, Serialize};

use crate::combat::DamageEvent;
use crate::core::{Stat, Stats};
use crate::game::member::MemberId;
use crate::game::session::Game;
use crate::units::constants::{
    PHASEBREAKER_FLARE_STACKS, PHASEBREAKER_PASSIVE_AP_RATIO, PHASEBREAKER_PHASE_1_AP,
    PHASEBREAKER_PHASE_2_AP, PHASEBREAKER_PHASE_2_SHIELD, PHASEBREAKER_VAR_FLARE,
    PHASEBREAKER_VAR_PHASE,
};
use crate::units::UnitKind;

/// The catalog of buff kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    /// Gunslinger's evasive roll: flat dodge while active.
    Roll,
    /// Berserker's fury: bonus damage on every attack, stacks.
    Rage,
    /// Blocks skill use while active.
    Silence,
    /// Phasebreaker's charged state: phase effects on the next turn.
    Flare,
}

impl BuffKind {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BuffKind::Roll => "Roll",
            BuffKind::Rage => "Rage",
            BuffKind::Silence => "Silence",
            BuffKind::Flare => "Flare",
        }
    }

    /// Whether this kind is hostile to its holder.
    #[must_use]
    pub fn is_debuff(&self) -> bool {
        matches!(self, BuffKind::Silence)
    }

    /// Whether re-applying adds a stack instead of only refreshing.
    #[must_use]
    pub fn stackable(&self) -> bool {
        matches!(self, BuffKind::Rage)
    }
}

/// One active buff on a member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    /// What the buff does.
    pub kind: BuffKind,
    /// The member that applied it.
    pub source: MemberId,
    /// Turns left; ticked down at the holder's turn start, removed at 0.
    pub remaining_turns: u32,
    /// Kind-specific magnitude, fixed at application time.
    pub power: f32,
    /// Stack count; 1 unless the kind is stackable.
    pub stacks: u32,
}

impl Buff {
    /// Create a single-stack buff.
    #[must_use]
    pub fn new(kind: BuffKind, source: MemberId, remaining_turns: u32, power: f32) -> Self {
        Self {
            kind,
            source,
            remaining_turns,
            power,
            stacks: 1,
        }
    }

    /// Stat contribution while active.
    #[must_use]
    pub fn stats(&self) -> Stats {
        match self.kind {
            BuffKind::Roll => Stats::new().with(Stat::Dodge, self.power),
            BuffKind::Rage | BuffKind::Silence | BuffKind::Flare => Stats::new(),
        }
    }
}

// === Pipeline hook dispatch ===
//
// Each dispatcher walks one member's buffs oldest-to-newest, mirroring the
// passive dispatchers in `units::passives`. The buff list is snapshotted
// first because hooks may touch the owning member.

fn snapshot(game: &Game, member: MemberId) -> Vec<Buff> {
    game.members[member.index()].buffs().to_vec()
}

/// `attack_out` hooks on the actor's buffs.
pub(crate) fn attack_out(game: &mut Game, ev: &mut DamageEvent) {
    for buff in snapshot(game, ev.actor) {
        match buff.kind {
            BuffKind::Rage => {
                ev.bonus += buff.power * buff.stacks as f32;
            }
            BuffKind::Roll | BuffKind::Silence | BuffKind::Flare => {}
        }
    }
}

/// `was_crit` hooks on the target's buffs.
pub(crate) fn was_crit(game: &mut Game, ev: &mut DamageEvent) {
    for buff in snapshot(game, ev.target) {
        match buff.kind {
            // No shipped buff adjusts incoming crits; the hook point stays.
            BuffKind::Roll | BuffKind::Rage | BuffKind::Silence | BuffKind::Flare => {}
        }
    }
}

/// `on_basic_attack` hooks on the actor's buffs.
pub(crate) fn on_basic_attack(game: &mut Game, ev: &mut DamageEvent) {
    for buff in snapshot(game, ev.actor) {
        match buff.kind {
            BuffKind::Flare => {
                let member = &mut game.members[ev.actor.index()];
                let phase = member
                    .vars
                    .peek_counter(UnitKind::Phasebreaker, PHASEBREAKER_VAR_PHASE);
                if phase == 1 {
                    // Phase 1: attacks permanently grant ability power and
                    // build Flare twice as fast.
                    member.base_mut().add(Stat::AbilityPower, PHASEBREAKER_PHASE_1_AP);
                    member
                        .vars
                        .stacker(
                            UnitKind::Phasebreaker,
                            PHASEBREAKER_VAR_FLARE,
                            PHASEBREAKER_FLARE_STACKS,
                        )
                        .stack();
                }
            }
            BuffKind::Roll | BuffKind::Rage | BuffKind::Silence => {}
        }
    }
}

/// `on_damage` hooks on the actor's buffs.
pub(crate) fn on_damage(game: &mut Game, ev: &mut DamageEvent) {
    for buff in snapshot(game, ev.actor) {
        match buff.kind {
            BuffKind::Flare => {
                let ap = game.members[ev.actor.index()].stats().get(Stat::AbilityPower);
                let phase = game.members[ev.actor.index()]
                    .vars
                    .peek_counter(UnitKind::Phasebreaker, PHASEBREAKER_VAR_PHASE);
                match phase {
                    2 => {
                        // Phase 2: shield for a share of the damage dealt.
                        let ratio =
                            PHASEBREAKER_PHASE_2_SHIELD + ap / (PHASEBREAKER_PHASE_2_AP * 100.0);
                        let line =
                            game.members[ev.actor.index()].add_shield(ev.total() * ratio);
                        ev.output.push(line);
                    }
                    3 => {
                        // Phase 3: scale up against the target's resist and
                        // double the passive bonus.
                        let target = &game.members[ev.target.index()];
                        let ignore = 1.0
                            + target.stats().get(Stat::Resist)
                            + if target.defensive {
                                crate::combat::pipeline::DEFEND_RESIST
                            } else {
                                0.0
                            };
                        ev.damage *= ignore;
                        ev.bonus *= ignore;
                        ev.bonus += ap * PHASEBREAKER_PASSIVE_AP_RATIO;
                    }
                    _ => {}
                }
            }
            BuffKind::Roll | BuffKind::Rage | BuffKind::Silence => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_flags() {
        assert!(BuffKind::Silence.is_debuff());
        assert!(!BuffKind::Roll.is_debuff());
        assert!(BuffKind::Rage.stackable());
        assert!(!BuffKind::Silence.stackable());
    }

    #[test]
    fn test_roll_contributes_dodge() {
        let buff = Buff::new(BuffKind::Roll, MemberId(0), 2, 0.4);
        assert_eq!(buff.stats().get(Stat::Dodge), 0.4);
        assert_eq!(buff.stats().get(Stat::AttackPower), 0.0);
    }

    #[test]
    fn test_rage_contributes_no_stats() {
        // Rage works through its attack_out hook, not the stat table.
        let buff = Buff::new(BuffKind::Rage, MemberId(1), 3, 6.6);
        assert!(buff.stats().is_empty());
    }
}
