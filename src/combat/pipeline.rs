//! The damage-resolution pipeline.
//!
//! One attack or ability use resolves through a fixed stage order:
//!
//! 1. `attack_out` on the actor's modifiers (unit passive, then buffs
//!    oldest to newest); may add bonus damage, force a crit, or alter base
//!    damage.
//! 2. `was_crit` on the target's modifiers; may lower the crit multiplier
//!    before it applies.
//! 3. Crit resolution: unless already forced, roll against the actor's
//!    crit chance; a crit multiplies base damage by
//!    `max(1, 1 + CritDamage + crit_mul)`.
//! 4. Dodge resolution against the target's dodge stat; cancels the rest
//!    of the pipeline, but side effects already committed stand.
//! 5. `on_basic_attack` (basic attacks only) then `on_damage` on the
//!    actor's modifiers.
//! 6. Shield absorb, then resist (plus the flat defensive-stance bonus)
//!    reduces the remainder.
//! 7. Health debit, life steal back to the actor, output assembly.
//!
//! RNG draw order inside one resolution is fixed (crit roll, then dodge
//! roll) and zero-probability rolls consume no draw, so outcomes are a
//! deterministic function of the session RNG.

use crate::combat::DamageEvent;
use crate::core::Stat;
use crate::game::member::MemberId;
use crate::game::session::Game;
use crate::modifiers::buff;
use crate::units::passives;

/// Flat resist granted by the defensive stance until the member's next
/// turn.
pub const DEFEND_RESIST: f32 = 0.2;

impl Game {
    /// Resolve one damage event against this session's state.
    ///
    /// `basic` selects whether the `on_basic_attack` stage runs. The event
    /// is mutated in place; callers read `output` (and `cancelled`)
    /// afterwards.
    pub(crate) fn resolve_damage(&mut self, ev: &mut DamageEvent, basic: bool) {
        passives::attack_out(self, ev);
        buff::attack_out(self, ev);

        passives::was_crit(self, ev);
        buff::was_crit(self, ev);

        // Crit resolution. Only base damage is multiplied; flat bonuses
        // ride through unchanged.
        let crit_chance = self.members[ev.actor.index()].stats().get(Stat::CritChance);
        if !ev.crit {
            ev.crit = self.rng.chance(crit_chance);
        }
        if ev.crit {
            let crit_damage = self.members[ev.actor.index()].stats().get(Stat::CritDamage);
            let factor = (1.0 + crit_damage + ev.crit_mul).max(1.0);
            ev.damage *= factor;
        }

        // Dodge resolution.
        let dodge = self.members[ev.target.index()].stats().get(Stat::Dodge);
        if self.rng.chance(dodge) {
            ev.cancelled = true;
            let name = self.members[ev.target.index()].username.clone();
            ev.output.push(format!("{name} dodged the attack!"));
            return;
        }

        if basic {
            passives::on_basic_attack(self, ev);
            buff::on_basic_attack(self, ev);
        }
        passives::on_damage(self, ev);
        buff::on_damage(self, ev);

        self.debit(ev);
    }

    /// Apply the event's total to the target and settle life steal.
    fn debit(&mut self, ev: &mut DamageEvent) {
        let total = ev.total().max(0.0);

        let target = &mut self.members[ev.target.index()];
        let absorbed = total.min(target.shield);
        target.shield -= absorbed;
        if absorbed > 0.0 {
            ev.output
                .push(format!("{}'s shield absorbs {absorbed:.0} damage.", target.username));
        }

        let resist = (target.stats().get(Stat::Resist)
            + if target.defensive { DEFEND_RESIST } else { 0.0 })
        .clamp(0.0, 1.0);
        let dealt = (total - absorbed) * (1.0 - resist);
        target.health -= dealt;

        let target_name = target.username.clone();
        let crit_note = if ev.crit { " Critical hit!" } else { "" };
        ev.output
            .push(format!("{target_name} takes {dealt:.0} damage.{crit_note}"));

        let life_steal = self.members[ev.actor.index()].stats().get(Stat::LifeSteal);
        if life_steal > 0.0 && dealt > 0.0 {
            let actor = &mut self.members[ev.actor.index()];
            let healed = actor.heal(dealt * life_steal);
            if healed > 0.0 {
                ev.output
                    .push(format!("{} steals {healed:.0} health.", actor.username));
            }
        }
    }

    /// Pick a uniformly random living opponent of `actor`.
    pub(crate) fn random_target(&mut self, actor: MemberId) -> Option<MemberId> {
        let candidates: Vec<MemberId> = self
            .members
            .iter()
            .filter(|m| m.id != actor && m.alive())
            .map(|m| m.id)
            .collect();
        self.rng.pick(&candidates).copied()
    }
}
