//! The per-session turn state machine.
//!
//! A [`Game`] owns its members, the turn rotation, the action log, and a
//! forked RNG. Sessions move `WaitingToStart → InProgress → Finished`;
//! exactly one member may act per turn, every accepted action runs through
//! the damage pipeline, and the win condition is evaluated after each one.
//!
//! All rejections happen before any state is touched: a refused action is
//! a pure return value.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{
    EngineError, EngineResult, GameMode, GameRng, PlayerId, SessionId, Stat, WinPolicy,
};
use crate::combat::DamageEvent;
use crate::game::member::{Member, MemberId};
use crate::units::{passives, skills::SkillKind, UnitKind};

/// Energy cost of the built-in basic attack.
pub const BASIC_ATTACK_ENERGY: f32 = 25.0;

/// Session lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Formed by the matchmaker, waiting for the explicit start event.
    WaitingToStart,
    /// Accepting actions from the current member.
    InProgress,
    /// Win condition reached; no further actions accepted.
    Finished,
}

/// An action a member may take on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// The built-in basic attack.
    Attack,
    /// Raise the defensive stance until the next own turn.
    Defend,
    /// One of the acting unit's skills.
    Skill(SkillKind),
}

/// One accepted action in the session log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Who acted.
    pub member: MemberId,
    /// Turn the action was accepted on.
    pub turn: u32,
    /// What was done.
    pub action: PlayerAction,
    /// The rendered result text.
    pub text: String,
}

/// What an accepted action produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionOutcome {
    /// Result text for the acting player.
    pub text: String,
    /// Whether this action finished the session.
    pub ended: bool,
    /// Sole survivor, set when `ended`.
    pub winner: Option<PlayerId>,
    /// Turn-start notifications for the next member (empty when `ended`).
    pub notifications: Vec<String>,
}

/// One combat session.
pub struct Game {
    id: SessionId,
    mode: GameMode,
    win_policy: WinPolicy,
    state: SessionState,
    pub(crate) members: Vec<Member>,
    current: usize,
    turn_count: u32,
    action_log: Vector<ActionRecord>,
    pub(crate) rng: GameRng,
    winner: Option<PlayerId>,
    pub(crate) rewarded: bool,
}

impl Game {
    /// Create a session in `WaitingToStart`.
    ///
    /// `roster` lists `(player, username, unit)` in join order; the first
    /// entry acts first once the session starts.
    #[must_use]
    pub fn new(
        id: SessionId,
        mode: GameMode,
        win_policy: WinPolicy,
        roster: Vec<(PlayerId, String, UnitKind)>,
        rng: GameRng,
    ) -> Self {
        debug_assert_eq!(roster.len(), mode.size(), "roster must fill the mode");
        let members = roster
            .into_iter()
            .enumerate()
            .map(|(i, (player, username, unit))| {
                Member::new(MemberId(i as u8), player, username, unit)
            })
            .collect();
        Self {
            id,
            mode,
            win_policy,
            state: SessionState::WaitingToStart,
            members,
            current: 0,
            turn_count: 0,
            action_log: Vector::new(),
            rng,
            winner: None,
            rewarded: false,
        }
    }

    // === Accessors ===

    /// Session id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Mode the session was formed for.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Turns elapsed; 0 until the session starts.
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// All members in join order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Look a member up by id.
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id.index())
    }

    /// Look a member up by the player behind it.
    #[must_use]
    pub fn member_by_player(&self, player: PlayerId) -> Option<&Member> {
        self.members.iter().find(|m| m.player == player)
    }

    /// The member whose turn it is.
    #[must_use]
    pub fn current_member(&self) -> &Member {
        &self.members[self.current]
    }

    /// Members still alive, in join order.
    #[must_use]
    pub fn alive(&self) -> Vec<MemberId> {
        self.members
            .iter()
            .filter(|m| m.alive())
            .map(|m| m.id)
            .collect()
    }

    /// Members knocked out, in join order.
    #[must_use]
    pub fn dead(&self) -> Vec<MemberId> {
        self.members
            .iter()
            .filter(|m| !m.alive())
            .map(|m| m.id)
            .collect()
    }

    /// The accepted-action log.
    #[must_use]
    pub fn action_log(&self) -> &Vector<ActionRecord> {
        &self.action_log
    }

    /// Sole survivor once the session is finished.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    // === Lifecycle ===

    /// Start the session: members enter at full health and energy, the
    /// first member in join order becomes current, and their turn-start
    /// hooks run. Returns the opening notifications.
    pub fn start(&mut self) -> EngineResult<Vec<String>> {
        if self.state != SessionState::WaitingToStart {
            return Err(EngineError::invalid("session has already started"));
        }
        self.state = SessionState::InProgress;
        self.turn_count = 1;
        self.current = 0;

        let mut notes = Vec::new();
        let first = self.members[self.current].id;
        if let Some(note) = passives::on_turn_start(self, first) {
            notes.push(note);
        }
        Ok(notes)
    }

    /// Submit one action for `member`.
    ///
    /// Rejected unless the session is in progress and `member` is current;
    /// rejections mutate nothing. An accepted action resolves fully, is
    /// logged, and either finishes the session or advances the turn.
    pub fn act(&mut self, member: MemberId, action: PlayerAction) -> EngineResult<ActionOutcome> {
        if self.state != SessionState::InProgress {
            return Err(EngineError::invalid("session is not in progress"));
        }
        if self.member(member).is_none() {
            return Err(EngineError::inconsistency(format!(
                "{member} is not part of {}",
                self.id
            )));
        }
        if self.current_member().id != member {
            return Err(EngineError::invalid("not this member's turn"));
        }

        let lines = match action {
            PlayerAction::Attack => self.basic_attack(member)?,
            PlayerAction::Defend => self.defend(member),
            PlayerAction::Skill(kind) => self.use_skill(member, kind)?,
        };
        let text = join_non_empty(&lines);
        self.action_log.push_back(ActionRecord {
            member,
            turn: self.turn_count,
            action,
            text: text.clone(),
        });

        let alive = self.alive();
        let ended = match self.win_policy {
            WinPolicy::SoleSurvivor => alive.len() <= 1,
        };
        if ended {
            self.state = SessionState::Finished;
            self.winner = alive
                .first()
                .and_then(|id| self.member(*id))
                .map(|m| m.player);
            Ok(ActionOutcome {
                text,
                ended: true,
                winner: self.winner,
                notifications: Vec::new(),
            })
        } else {
            let notifications = self.advance_turn();
            Ok(ActionOutcome {
                text,
                ended: false,
                winner: None,
                notifications,
            })
        }
    }

    /// Rotate to the next living member and run their turn-start
    /// bookkeeping. Returns the notifications produced.
    fn advance_turn(&mut self) -> Vec<String> {
        self.turn_count += 1;

        let len = self.members.len();
        for step in 1..=len {
            let candidate = (self.current + step) % len;
            if self.members[candidate].alive() {
                self.current = candidate;
                break;
            }
        }
        let id = self.members[self.current].id;

        // Stance reset and per-turn regeneration before hooks run.
        {
            let member = &mut self.members[self.current];
            member.defensive = false;
            let stats = member.stats();
            let regen = stats.get(Stat::HealthPerTurn);
            if regen > 0.0 {
                member.heal(regen);
            }
            let energy = stats.get(Stat::EnergyPerTurn);
            if energy > 0.0 {
                member.gain_energy(energy);
            }
        }

        let mut notes = Vec::new();
        if let Some(note) = passives::on_turn_start(self, id) {
            notes.push(note);
        }
        notes.extend(self.members[self.current].tick_buffs());

        let ready = self.members[self.current].vars.tick_cooldowns();
        let username = self.members[self.current].username.clone();
        for name in ready {
            notes.push(format!("{username}'s {name} is ready."));
        }
        notes
    }

    // === Built-in actions ===

    fn basic_attack(&mut self, actor: MemberId) -> EngineResult<Vec<String>> {
        if self.members[actor.index()].energy() < BASIC_ATTACK_ENERGY {
            return Err(EngineError::insufficient(format!(
                "attacking needs {BASIC_ATTACK_ENERGY:.0} energy"
            )));
        }
        let target = self
            .random_target(actor)
            .ok_or_else(|| EngineError::inconsistency("no living opponent to target"))?;
        self.members[actor.index()].spend_energy(BASIC_ATTACK_ENERGY);

        let mut ev = DamageEvent::new(actor, target);
        ev.damage += self.members[actor.index()].stats().get(Stat::AttackPower);
        self.resolve_damage(&mut ev, true);

        let mut lines = vec![format!(
            "{} attacks {}.",
            self.members[actor.index()].username,
            self.members[target.index()].username
        )];
        lines.extend(ev.output);
        Ok(lines)
    }

    fn defend(&mut self, actor: MemberId) -> Vec<String> {
        let member = &mut self.members[actor.index()];
        member.defensive = true;
        vec![format!("{} braces behind their guard.", member.username)]
    }

    fn use_skill(&mut self, actor: MemberId, kind: SkillKind) -> EngineResult<Vec<String>> {
        let unit = self.members[actor.index()].unit;
        if kind.unit() != unit {
            return Err(EngineError::invalid(format!(
                "{} has no skill named {}",
                unit.name(),
                kind.name()
            )));
        }
        if self.members[actor.index()].silenced() {
            return Err(EngineError::invalid("cannot use skills while silenced"));
        }

        let total = kind.cooldown();
        {
            let cooldown = self.members[actor.index()]
                .vars
                .cooldown(unit, kind.name(), total);
            if !cooldown.is_done() {
                let left = cooldown.remaining();
                return Err(EngineError::insufficient(format!(
                    "{} is on cooldown for {left} more turn(s)",
                    kind.name()
                )));
            }
        }
        let cost = kind.energy_cost();
        if self.members[actor.index()].energy() < cost {
            return Err(EngineError::insufficient(format!(
                "{} needs {cost:.0} energy",
                kind.name()
            )));
        }
        kind.validate(self, actor)?;

        // Validation complete; commit resources, then run the skill.
        {
            let member = &mut self.members[actor.index()];
            member.vars.cooldown(unit, kind.name(), total).start();
            member.spend_energy(cost);
        }
        kind.execute(self, actor)
    }
}

/// Join output lines, skipping empties.
fn join_non_empty(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|line| !line.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
