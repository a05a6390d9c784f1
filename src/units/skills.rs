//! Skill definitions and execution.
//!
//! A [`SkillKind`] carries the static half of a skill (owning unit,
//! display name, cooldown, energy cost, description) plus two routines the
//! session calls: [`validate`](SkillKind::validate) before any state is
//! touched (rejections must be atomic) and [`execute`](SkillKind::execute)
//! after the cooldown has started and energy has been deducted.

use serde::{Deserialize, Serialize};

use crate::combat::DamageEvent;
use crate::core::{EngineError, EngineResult, Stat};
use crate::game::member::{MemberId, VarValue};
use crate::game::session::Game;
use crate::modifiers::{Buff, BuffKind};
use crate::units::constants::*;
use crate::units::UnitKind;

/// Every active skill in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Warrior: break the target's guard and shield, then strike.
    Bash,
    /// Gunslinger: a volley of independent shots.
    Barrage,
    /// Gunslinger: evasive roll; heavy dodge, drains all energy.
    Roll,
    /// Gunslinger: one heavy shot with a Jackpot branch.
    Deadeye,
    /// Duelist: strike and silence the target.
    Disarm,
    /// Berserker: stackable bonus-damage fury.
    Rage,
    /// Phasebreaker: consume Flare stacks for next-turn phase effects.
    Flare,
}

impl SkillKind {
    /// The unit this skill belongs to.
    #[must_use]
    pub fn unit(&self) -> UnitKind {
        match self {
            SkillKind::Bash => UnitKind::Warrior,
            SkillKind::Barrage | SkillKind::Roll | SkillKind::Deadeye => UnitKind::Gunslinger,
            SkillKind::Disarm => UnitKind::Duelist,
            SkillKind::Rage => UnitKind::Berserker,
            SkillKind::Flare => UnitKind::Phasebreaker,
        }
    }

    /// Selector name, lower case.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SkillKind::Bash => "bash",
            SkillKind::Barrage => "barrage",
            SkillKind::Roll => "roll",
            SkillKind::Deadeye => "deadeye",
            SkillKind::Disarm => "disarm",
            SkillKind::Rage => "rage",
            SkillKind::Flare => "flare",
        }
    }

    /// Cooldown in turns; 0 means no cooldown.
    #[must_use]
    pub fn cooldown(&self) -> u32 {
        match self {
            SkillKind::Bash => 4,
            SkillKind::Barrage => 2,
            SkillKind::Roll => 3,
            SkillKind::Deadeye => 4,
            SkillKind::Disarm => 4,
            SkillKind::Rage => 3,
            SkillKind::Flare => 0,
        }
    }

    /// Energy deducted on use.
    #[must_use]
    pub fn energy_cost(&self) -> f32 {
        match self {
            SkillKind::Bash => 25.0,
            SkillKind::Barrage => 25.0,
            SkillKind::Roll => 0.0,
            SkillKind::Deadeye => 50.0,
            SkillKind::Disarm => 30.0,
            SkillKind::Rage => 25.0,
            SkillKind::Flare => 25.0,
        }
    }

    /// Player-facing description.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            SkillKind::Bash => format!(
                "Break the target's shield and guard, then deal {:.0}% Attack Power + {:.0}% Skill Power.",
                WARRIOR_BASH_AP_RATIO * 100.0,
                WARRIOR_BASH_SP_RATIO * 100.0
            ),
            SkillKind::Barrage => format!(
                "Fire {} shots, each dealing {:.0} + {:.0}% Attack Power + {:.0}% Skill Power. \
                 Shots can crit, and each landed shot raises the Jackpot chance.",
                GUNSLINGER_BARRAGE_SHOTS,
                GUNSLINGER_BARRAGE_DAMAGE,
                GUNSLINGER_BARRAGE_AP_RATIO * 100.0,
                GUNSLINGER_BARRAGE_SP_RATIO * 100.0
            ),
            SkillKind::Roll => format!(
                "Gain {:.0}% + 0.5% per Skill Power dodge for {} turns, draining all energy.",
                GUNSLINGER_ROLL_DODGE * 100.0,
                GUNSLINGER_ROLL_TURNS
            ),
            SkillKind::Deadeye => format!(
                "Deal {:.0} + {:.0}% Attack Power. {:.0}% chance (+{:.0}% per landed Barrage shot) \
                 to Jackpot, dealing {:.0}% of the target's missing health instead.",
                GUNSLINGER_DEADEYE_DAMAGE,
                GUNSLINGER_DEADEYE_AP_RATIO * 100.0,
                GUNSLINGER_DEADEYE_CHANCE * 100.0,
                GUNSLINGER_DEADEYE_PER_SHOT * 100.0,
                GUNSLINGER_DEADEYE_JACKPOT_RATIO * 100.0
            ),
            SkillKind::Disarm => format!(
                "Deal {:.0}% Attack Power and silence the target until the end of their next turn.",
                DUELIST_DISARM_AP_RATIO * 100.0
            ),
            SkillKind::Rage => format!(
                "Rage for {} turns: every attack deals {:.0}% Attack Power bonus damage per stack. Stacks.",
                BERSERKER_RAGE_TURNS,
                BERSERKER_RAGE_AP_RATIO * 100.0
            ),
            SkillKind::Flare => {
                "Consume full Flare stacks to charge the current phase's effect for the next turn."
                    .to_string()
            }
        }
    }

    /// Extra preconditions beyond cooldown and energy.
    ///
    /// Runs before any state is touched so a rejection leaves the session
    /// unchanged.
    pub(crate) fn validate(&self, game: &Game, actor: MemberId) -> EngineResult<()> {
        match self {
            SkillKind::Flare => {
                let charged = matches!(
                    game.members[actor.index()]
                        .vars
                        .get(UnitKind::Phasebreaker, PHASEBREAKER_VAR_FLARE),
                    Some(VarValue::Stacker(s)) if s.is_full()
                );
                if charged {
                    Ok(())
                } else {
                    Err(EngineError::insufficient("Flare is not fully charged"))
                }
            }
            _ => Ok(()),
        }
    }

    /// Run the skill. Cooldown and energy are already committed.
    pub(crate) fn execute(&self, game: &mut Game, actor: MemberId) -> EngineResult<Vec<String>> {
        let actor_name = game.members[actor.index()].username.clone();
        let mut lines = vec![format!("{actor_name} uses {}!", title(self.name()))];

        match self {
            SkillKind::Bash => {
                let target = require_target(game, actor)?;
                {
                    let t = &mut game.members[target.index()];
                    t.defensive = false;
                    if t.shield > 0.0 {
                        t.shield = 0.0;
                        lines.push(format!("It broke {}'s shield!", t.username));
                    }
                }
                let stats = game.members[actor.index()].stats();
                let mut ev = DamageEvent::new(actor, target);
                ev.damage += stats.get(Stat::AttackPower) * WARRIOR_BASH_AP_RATIO;
                ev.damage += stats.get(Stat::SkillPower) * WARRIOR_BASH_SP_RATIO;
                game.resolve_damage(&mut ev, false);
                lines.extend(ev.output);
            }

            SkillKind::Barrage => {
                let target = require_target(game, actor)?;
                let mut landed = game.members[actor.index()]
                    .vars
                    .peek_counter(UnitKind::Gunslinger, GUNSLINGER_VAR_BARRAGE_COUNT);
                for _ in 0..GUNSLINGER_BARRAGE_SHOTS {
                    if !game.members[target.index()].alive() {
                        break;
                    }
                    let stats = game.members[actor.index()].stats();
                    let mut ev = DamageEvent::new(actor, target);
                    ev.damage += GUNSLINGER_BARRAGE_DAMAGE;
                    ev.damage += stats.get(Stat::AttackPower) * GUNSLINGER_BARRAGE_AP_RATIO;
                    ev.damage += stats.get(Stat::SkillPower) * GUNSLINGER_BARRAGE_SP_RATIO;
                    game.resolve_damage(&mut ev, false);
                    if !ev.cancelled {
                        landed += 1;
                    }
                    lines.extend(ev.output);
                }
                *game.members[actor.index()]
                    .vars
                    .counter(UnitKind::Gunslinger, GUNSLINGER_VAR_BARRAGE_COUNT) = landed;
            }

            SkillKind::Roll => {
                let m = &mut game.members[actor.index()];
                let power =
                    GUNSLINGER_ROLL_DODGE + m.stats().get(Stat::SkillPower) * GUNSLINGER_ROLL_SP_RATIO;
                m.apply_buff(Buff::new(BuffKind::Roll, actor, GUNSLINGER_ROLL_TURNS, power));
                m.set_energy(0.0);
                lines.push(format!(
                    "{actor_name} gains {:.0}% dodge.",
                    power * 100.0
                ));
            }

            SkillKind::Deadeye => {
                let target = require_target(game, actor)?;
                let landed = game.members[actor.index()]
                    .vars
                    .peek_counter(UnitKind::Gunslinger, GUNSLINGER_VAR_BARRAGE_COUNT);
                let jackpot_chance =
                    GUNSLINGER_DEADEYE_CHANCE + landed as f32 * GUNSLINGER_DEADEYE_PER_SHOT;
                let jackpot = game.rng.chance(jackpot_chance);

                let mut ev = DamageEvent::new(actor, target);
                if jackpot {
                    let t = &game.members[target.index()];
                    let missing = t.stats().get(Stat::MaxHealth) - t.health;
                    ev.damage += (missing * GUNSLINGER_DEADEYE_JACKPOT_RATIO).max(1.0);
                    lines.push("Jackpot!".to_string());
                } else {
                    let stats = game.members[actor.index()].stats();
                    ev.damage += GUNSLINGER_DEADEYE_DAMAGE;
                    ev.damage += stats.get(Stat::AttackPower) * GUNSLINGER_DEADEYE_AP_RATIO;
                }
                game.resolve_damage(&mut ev, false);
                lines.extend(ev.output);
            }

            SkillKind::Disarm => {
                let target = require_target(game, actor)?;
                let stats = game.members[actor.index()].stats();
                let mut ev = DamageEvent::new(actor, target);
                ev.damage += stats.get(Stat::AttackPower) * DUELIST_DISARM_AP_RATIO;
                game.resolve_damage(&mut ev, false);
                let cancelled = ev.cancelled;
                lines.extend(ev.output);
                if !cancelled {
                    let t = &mut game.members[target.index()];
                    t.apply_buff(Buff::new(
                        BuffKind::Silence,
                        actor,
                        DUELIST_DISARM_TURNS,
                        0.0,
                    ));
                    lines.push(format!("{} is silenced!", t.username));
                }
            }

            SkillKind::Rage => {
                let m = &mut game.members[actor.index()];
                let power = m.stats().get(Stat::AttackPower) * BERSERKER_RAGE_AP_RATIO;
                let stacks =
                    m.apply_buff(Buff::new(BuffKind::Rage, actor, BERSERKER_RAGE_TURNS, power));
                lines.push(format!("{actor_name} rages at {stacks} stack(s)."));
            }

            SkillKind::Flare => {
                let m = &mut game.members[actor.index()];
                m.vars
                    .stacker(
                        UnitKind::Phasebreaker,
                        PHASEBREAKER_VAR_FLARE,
                        PHASEBREAKER_FLARE_STACKS,
                    )
                    .reset();
                m.apply_buff(Buff::new(
                    BuffKind::Flare,
                    actor,
                    PHASEBREAKER_FLARE_TURNS,
                    0.0,
                ));
                let phase = m.vars.peek_counter(UnitKind::Phasebreaker, PHASEBREAKER_VAR_PHASE);
                lines.push(format!(
                    "{actor_name} charges Flare in Phase {phase}."
                ));
            }
        }

        Ok(lines)
    }
}

impl std::fmt::Display for SkillKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Capitalize a selector name for output lines.
fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn require_target(game: &mut Game, actor: MemberId) -> EngineResult<MemberId> {
    game.random_target(actor)
        .ok_or_else(|| EngineError::inconsistency("no living opponent to target"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameMode, GameRng, PlayerId, SessionId, WinPolicy};
    use crate::game::session::PlayerAction;

    fn duel(a: UnitKind, b: UnitKind, seed: u64) -> Game {
        let mut game = Game::new(
            SessionId(1),
            GameMode::Duel,
            WinPolicy::SoleSurvivor,
            vec![
                (PlayerId::new(1), "alice".to_string(), a),
                (PlayerId::new(2), "bob".to_string(), b),
            ],
            GameRng::new(seed),
        );
        game.start().unwrap();
        game
    }

    #[test]
    fn test_certain_jackpot_deals_missing_health() {
        let mut game = duel(UnitKind::Gunslinger, UnitKind::Warrior, 42);
        game.members[1].health = 100.0;
        // 14 landed Barrage shots push the Jackpot chance to certainty,
        // so no roll is drawn and the branch is deterministic.
        *game.members[0]
            .vars
            .counter(UnitKind::Gunslinger, GUNSLINGER_VAR_BARRAGE_COUNT) = 14;

        let outcome = game
            .act(MemberId(0), PlayerAction::Skill(SkillKind::Deadeye))
            .unwrap();
        assert!(outcome.text.contains("Jackpot!"));
        assert!(outcome.ended);
        assert!(game.members[1].health <= 0.0);
    }

    #[test]
    fn test_barrage_counts_landed_shots_and_starts_cooldown() {
        let mut game = duel(UnitKind::Gunslinger, UnitKind::Warrior, 42);
        game.act(MemberId(0), PlayerAction::Skill(SkillKind::Barrage))
            .unwrap();

        assert_eq!(
            game.members[0]
                .vars
                .peek_counter(UnitKind::Gunslinger, GUNSLINGER_VAR_BARRAGE_COUNT),
            GUNSLINGER_BARRAGE_SHOTS as i32
        );
        let cooldown = game.members[0]
            .vars
            .cooldown(UnitKind::Gunslinger, "barrage", SkillKind::Barrage.cooldown());
        assert!(!cooldown.is_done());
    }

    #[test]
    fn test_roll_drains_energy_and_grants_dodge() {
        let mut game = duel(UnitKind::Gunslinger, UnitKind::Warrior, 42);
        game.act(MemberId(0), PlayerAction::Skill(SkillKind::Roll))
            .unwrap();

        let gunslinger = &game.members[0];
        assert_eq!(gunslinger.energy(), 0.0);
        assert!(gunslinger.has_buff(BuffKind::Roll));
        assert_eq!(gunslinger.stats().get(Stat::Dodge), GUNSLINGER_ROLL_DODGE);
    }

    #[test]
    fn test_disarm_silences_on_hit() {
        let mut game = duel(UnitKind::Duelist, UnitKind::Warrior, 42);
        let outcome = game
            .act(MemberId(0), PlayerAction::Skill(SkillKind::Disarm))
            .unwrap();

        assert!(outcome.text.contains("silenced"));
        assert!(game.members[1].silenced());
    }

    #[test]
    fn test_flare_requires_full_stacks() {
        let mut game = duel(UnitKind::Phasebreaker, UnitKind::Warrior, 42);
        let energy_before = game.members[0].energy();

        let err = game
            .act(MemberId(0), PlayerAction::Skill(SkillKind::Flare))
            .unwrap_err();
        assert!(matches!(err, crate::core::EngineError::InsufficientResource(_)));
        // The rejection is atomic: no energy spent, still this member's turn.
        assert_eq!(game.members[0].energy(), energy_before);
        assert_eq!(game.current_member().id, MemberId(0));
    }

    #[test]
    fn test_flare_consumes_stacks_and_applies_buff() {
        let mut game = duel(UnitKind::Phasebreaker, UnitKind::Warrior, 42);
        {
            let stacker = game.members[0].vars.stacker(
                UnitKind::Phasebreaker,
                PHASEBREAKER_VAR_FLARE,
                PHASEBREAKER_FLARE_STACKS,
            );
            while !stacker.is_full() {
                stacker.stack();
            }
        }

        game.act(MemberId(0), PlayerAction::Skill(SkillKind::Flare))
            .unwrap();
        assert!(game.members[0].has_buff(BuffKind::Flare));
        let stacker = game.members[0].vars.stacker(
            UnitKind::Phasebreaker,
            PHASEBREAKER_VAR_FLARE,
            PHASEBREAKER_FLARE_STACKS,
        );
        assert_eq!(stacker.current(), 0);
    }

    #[test]
    fn test_rage_stacks_across_uses() {
        let mut game = duel(UnitKind::Berserker, UnitKind::Warrior, 42);
        game.act(MemberId(0), PlayerAction::Skill(SkillKind::Rage))
            .unwrap();
        assert_eq!(game.members[0].buffs()[0].stacks, 1);

        // Wait out the cooldown, then rage again while the first is live.
        for _ in 0..2 {
            game.act(MemberId(1), PlayerAction::Defend).unwrap();
            game.act(MemberId(0), PlayerAction::Defend).unwrap();
        }
        game.act(MemberId(1), PlayerAction::Defend).unwrap();
        game.act(MemberId(0), PlayerAction::Skill(SkillKind::Rage))
            .unwrap();
        assert_eq!(game.members[0].buffs()[0].stacks, 2);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(SkillKind::Bash.unit(), UnitKind::Warrior);
        assert_eq!(SkillKind::Bash.cooldown(), 4);
        assert_eq!(SkillKind::Deadeye.energy_cost(), 50.0);
        assert_eq!(SkillKind::Roll.energy_cost(), 0.0);
        assert_eq!(SkillKind::Flare.cooldown(), 0);
    }

    #[test]
    fn test_names_are_lowercase_and_unique() {
        let kinds = [
            SkillKind::Bash,
            SkillKind::Barrage,
            SkillKind::Roll,
            SkillKind::Deadeye,
            SkillKind::Disarm,
            SkillKind::Rage,
            SkillKind::Flare,
        ];
        let mut seen = std::collections::HashSet::new();
        for kind in kinds {
            assert_eq!(kind.name(), kind.name().to_lowercase());
            assert!(seen.insert(kind.name()), "duplicate name {}", kind.name());
        }
    }

    #[test]
    fn test_title_case_helper() {
        assert_eq!(title("bash"), "Bash");
        assert_eq!(title(""), "");
    }
}
