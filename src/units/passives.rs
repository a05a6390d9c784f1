//! Pipeline hook dispatch for unit passives.
//!
//! Each dispatcher looks up the relevant member's passive and matches on
//! its kind. Hooks are total: a kind without behavior at a hook point
//! falls through and the event passes unchanged. The companion buff
//! dispatchers live in [`modifiers::buff`](crate::modifiers::buff); the
//! pipeline always runs the passive first, then buffs oldest to newest.

use crate::combat::DamageEvent;
use crate::core::Stat;
use crate::game::member::MemberId;
use crate::game::session::Game;
use crate::units::constants::*;
use crate::units::effect::EffectKind;
use crate::units::UnitKind;

/// `on_turn_start`: once at the start of the member's turn, before any
/// action. Resets per-turn flags; may emit a notification.
pub(crate) fn on_turn_start(game: &mut Game, member: MemberId) -> Option<String> {
    let effect = game.members[member.index()].unit.passive();
    match effect.kind {
        EffectKind::Deadshot => {
            let m = &mut game.members[member.index()];
            *m.vars
                .flag(UnitKind::Gunslinger, GUNSLINGER_VAR_FIRST_ATTACKED) = false;
            None
        }
        EffectKind::PhaseShift => {
            let m = &mut game.members[member.index()];
            let phase = m.vars.counter(UnitKind::Phasebreaker, PHASEBREAKER_VAR_PHASE);
            *phase = *phase % 3 + 1;
            let phase = *phase;
            Some(format!("{} shifts to Phase {phase}.", m.username))
        }
        EffectKind::Momentum | EffectKind::Poise | EffectKind::Frenzy => None,
    }
}

/// `attack_out` on the actor's passive: may add bonus damage, force a
/// crit, or alter base damage.
pub(crate) fn attack_out(game: &mut Game, ev: &mut DamageEvent) {
    let effect = game.members[ev.actor.index()].unit.passive();
    match effect.kind {
        EffectKind::Deadshot => {
            let m = &mut game.members[ev.actor.index()];
            let already = {
                let flag = m
                    .vars
                    .flag(UnitKind::Gunslinger, GUNSLINGER_VAR_FIRST_ATTACKED);
                let v = *flag;
                *flag = true;
                v
            };
            if !already {
                ev.crit = true;
                ev.bonus += m.stats().get(Stat::AttackPower) * effect.power;
            }
        }
        EffectKind::Momentum => {
            let m = &mut game.members[ev.actor.index()];
            let fired = {
                let stacker = m.vars.stacker(
                    UnitKind::Warrior,
                    WARRIOR_VAR_MOMENTUM,
                    WARRIOR_PASSIVE_LIMIT,
                );
                // A stacker pinned at its limit by an earlier turn still
                // counts as an activation on this hit.
                let fired = stacker.stack() || stacker.is_full();
                if fired {
                    stacker.reset();
                }
                fired
            };
            if fired {
                ev.bonus += m.stats().get(Stat::AttackPower) * effect.power;
            }
        }
        EffectKind::Frenzy => {
            let m = &game.members[ev.actor.index()];
            let max = m.stats().get(Stat::MaxHealth);
            if max > 0.0 {
                let missing = ((max - m.health) / max).clamp(0.0, 1.0);
                ev.bonus += ev.damage * missing * effect.power;
            }
        }
        EffectKind::Poise | EffectKind::PhaseShift => {}
    }
}

/// `was_crit` on the target's passive: may lower the crit multiplier
/// before it is applied.
pub(crate) fn was_crit(game: &mut Game, ev: &mut DamageEvent) {
    let effect = game.members[ev.target.index()].unit.passive();
    match effect.kind {
        EffectKind::Poise => {
            ev.crit_mul -= effect.power;
        }
        EffectKind::Momentum
        | EffectKind::Deadshot
        | EffectKind::Frenzy
        | EffectKind::PhaseShift => {}
    }
}

/// `on_basic_attack` on the actor's passive (basic attacks only).
pub(crate) fn on_basic_attack(game: &mut Game, ev: &mut DamageEvent) {
    let effect = game.members[ev.actor.index()].unit.passive();
    match effect.kind {
        EffectKind::PhaseShift => {
            let m = &mut game.members[ev.actor.index()];
            m.vars
                .stacker(
                    UnitKind::Phasebreaker,
                    PHASEBREAKER_VAR_FLARE,
                    PHASEBREAKER_FLARE_STACKS,
                )
                .stack();
        }
        EffectKind::Momentum | EffectKind::Deadshot | EffectKind::Poise | EffectKind::Frenzy => {}
    }
}

/// `on_damage` on the actor's passive, after crit and dodge resolution.
pub(crate) fn on_damage(game: &mut Game, ev: &mut DamageEvent) {
    let effect = game.members[ev.actor.index()].unit.passive();
    match effect.kind {
        EffectKind::PhaseShift => {
            let ap = game.members[ev.actor.index()].stats().get(Stat::AbilityPower);
            ev.damage += ap * effect.power;
        }
        EffectKind::Momentum | EffectKind::Deadshot | EffectKind::Poise | EffectKind::Frenzy => {}
    }
}
