//! The engine context object.
//!
//! An [`Engine`] owns everything a running deployment needs: configuration,
//! the unit catalog, the matchmaker, the table of open sessions, player
//! records, the master RNG, and the handles to the persistence and
//! delivery collaborators. It replaces any notion of a global instance:
//! embedders construct one and thread it through their I/O layer.
//!
//! ## Locking
//!
//! The queues live behind one lock because a refresh reads and mutates
//! several of them together; each open session has its own lock so actions
//! against different sessions never contend. Lock order is fixed: the
//! session table is released before a session is locked, and the player
//! table is only taken while applying rewards. The periodic refresh ticker
//! is the embedder's concern; the engine just exposes [`refresh`].
//!
//! [`refresh`]: Engine::refresh

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::core::{
    EngineConfig, EngineError, EngineResult, EventSink, GameMode, GameRng, LifecycleEvent, Player,
    PlayerId, PlayerStore, SessionId, SessionSummary,
};
use crate::game::session::{Game, PlayerAction};
use crate::queue::Matchmaker;
use crate::units::{registry::resolve_name, UnitKind, UnitRegistry};

/// The engine context. See the module docs.
pub struct Engine {
    config: EngineConfig,
    units: UnitRegistry,
    matchmaker: Mutex<Matchmaker>,
    sessions: Mutex<FxHashMap<SessionId, Arc<Mutex<Game>>>>,
    in_session: Mutex<FxHashMap<PlayerId, SessionId>>,
    players: Mutex<FxHashMap<PlayerId, Player>>,
    selections: Mutex<FxHashMap<PlayerId, UnitKind>>,
    store: Arc<dyn PlayerStore>,
    sink: Arc<dyn EventSink>,
    rng: Mutex<GameRng>,
    next_session: Mutex<u64>,
}

impl Engine {
    /// Build an engine from configuration and its two collaborators.
    #[must_use]
    pub fn new(config: EngineConfig, store: Arc<dyn PlayerStore>, sink: Arc<dyn EventSink>) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            units: UnitRegistry::new(),
            matchmaker: Mutex::new(Matchmaker::new()),
            sessions: Mutex::new(FxHashMap::default()),
            in_session: Mutex::new(FxHashMap::default()),
            players: Mutex::new(FxHashMap::default()),
            selections: Mutex::new(FxHashMap::default()),
            store,
            sink,
            rng: Mutex::new(rng),
            next_session: Mutex::new(0),
        }
    }

    /// The configuration this engine runs with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Players and the unit catalog ===

    /// Register (or rename) a player record.
    pub fn register_player(&self, id: PlayerId, username: impl Into<String>) {
        let username = username.into();
        let mut players = self.players.lock();
        players
            .entry(id)
            .and_modify(|p| p.username = username.clone())
            .or_insert_with(|| Player::new(id, username.clone()));
    }

    /// Snapshot of a player record.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<Player> {
        self.players.lock().get(&id).cloned()
    }

    /// Catalog lookup: exact name, unique 3+ character prefix, or
    /// `"random"`.
    #[must_use]
    pub fn unit_by_name(&self, query: &str) -> Option<UnitKind> {
        self.units.by_name_or_random(query, &mut self.rng.lock())
    }

    /// Choose the unit a player will queue with.
    pub fn select_unit(&self, player: PlayerId, query: &str) -> EngineResult<UnitKind> {
        let unit = self
            .unit_by_name(query)
            .ok_or_else(|| EngineError::invalid(format!("no unit matches '{query}'")))?;
        self.selections.lock().insert(player, unit);
        Ok(unit)
    }

    /// The unit a player currently has selected.
    #[must_use]
    pub fn selected_unit(&self, player: PlayerId) -> Option<UnitKind> {
        self.selections.lock().get(&player).copied()
    }

    // === Queue operations ===

    /// Add a player to a mode's queue, then run a refresh tick.
    pub fn enqueue(&self, player: PlayerId, mode: GameMode) -> EngineResult<()> {
        if !self.config.modes.contains(&mode) {
            return Err(EngineError::invalid(format!("mode {mode} is not enabled")));
        }
        if self.selections.lock().get(&player).is_none() {
            return Err(EngineError::invalid("select a unit before queueing"));
        }
        {
            // Hold the queue lock across the session check so a refresh
            // can't match this player in between.
            let mut matchmaker = self.matchmaker.lock();
            if self.in_session.lock().contains_key(&player) {
                return Err(EngineError::AlreadyInSession);
            }
            matchmaker.enqueue(player, mode)?;
        }
        info!(%player, %mode, "player queued");
        self.refresh();
        Ok(())
    }

    /// Voluntarily leave the queue; no effect once matched.
    pub fn dequeue(&self, player: PlayerId) -> bool {
        let removed = self.matchmaker.lock().dequeue(player);
        if removed {
            info!(%player, "player left the queue");
        }
        removed
    }

    /// Whether a player is waiting in any queue.
    #[must_use]
    pub fn is_queued(&self, player: PlayerId) -> bool {
        self.matchmaker.lock().is_queued(player)
    }

    /// One matchmaking tick across every mode.
    ///
    /// Invoked by the embedder's periodic timer and after each enqueue.
    /// Forms at most one session per mode, emits `MatchFound` for each,
    /// and leaves the new sessions in `WaitingToStart`.
    pub fn refresh(&self) {
        let groups = {
            let mut matchmaker = self.matchmaker.lock();
            let groups = matchmaker.take_matches();
            // Mark members in-session before the queue lock drops so a
            // concurrent enqueue cannot double-book them.
            let mut in_session = self.in_session.lock();
            let mut next = self.next_session.lock();
            let mut tagged = Vec::new();
            for (mode, members) in groups {
                *next += 1;
                let id = SessionId(*next);
                for &member in &members {
                    in_session.insert(member, id);
                }
                tagged.push((id, mode, members));
            }
            tagged
        };

        for (id, mode, member_ids) in groups {
            let roster: Vec<(PlayerId, String, UnitKind)> = {
                let players = self.players.lock();
                let selections = self.selections.lock();
                member_ids
                    .iter()
                    .map(|&pid| {
                        let username = players
                            .get(&pid)
                            .map(|p| p.username.clone())
                            .unwrap_or_else(|| pid.to_string());
                        let unit = selections.get(&pid).copied().unwrap_or_else(|| {
                            // Selection was required at enqueue time; fall
                            // back to a random pick if it was cleared since.
                            *self
                                .rng
                                .lock()
                                .pick(&UnitKind::ALL)
                                .unwrap_or(&UnitKind::Warrior)
                        });
                        (pid, username, unit)
                    })
                    .collect()
            };

            let session_rng = self.rng.lock().fork();
            let game = Game::new(id, mode, self.config.win_policy, roster, session_rng);
            self.sessions.lock().insert(id, Arc::new(Mutex::new(game)));

            info!(%id, %mode, players = member_ids.len(), "match found");
            self.sink.publish(LifecycleEvent::MatchFound {
                mode,
                session: id,
                members: member_ids,
            });
        }
    }

    // === Session operations ===

    /// Handle to an open session, for embedder introspection.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<Arc<Mutex<Game>>> {
        self.sessions.lock().get(&id).cloned()
    }

    /// Fire the explicit start event for a formed session.
    pub fn start_session(&self, id: SessionId) -> EngineResult<()> {
        let session = self.session(id).ok_or(EngineError::SessionNotFound)?;
        let notifications = session.lock().start()?;
        info!(%id, "session started");
        self.sink.publish(LifecycleEvent::TurnAdvanced {
            session: id,
            notifications,
        });
        Ok(())
    }

    /// Submit one action: a basic `attack`, `defend`, or a skill name of
    /// the acting member's unit (case-insensitive, unique 3+ character
    /// prefixes allowed). Returns the result text or a structured
    /// rejection.
    pub fn submit_action(
        &self,
        session_id: SessionId,
        player: PlayerId,
        selector: &str,
    ) -> EngineResult<String> {
        let session = self.session(session_id).ok_or(EngineError::SessionNotFound)?;
        let mut game = session.lock();

        let (member, unit) = game
            .member_by_player(player)
            .map(|m| (m.id, m.unit))
            .ok_or_else(|| EngineError::invalid("you are not part of this session"))?;
        let action = parse_selector(selector, unit)?;

        let outcome = game.act(member, action)?;
        debug!(%session_id, %player, ?action, "action accepted");

        if outcome.ended {
            self.finish_session(session_id, &mut game, outcome.winner);
        } else {
            self.sink.publish(LifecycleEvent::TurnAdvanced {
                session: session_id,
                notifications: outcome.notifications,
            });
        }
        Ok(outcome.text)
    }

    /// Apply rewards, emit `SessionEnded`, and tear the session down.
    fn finish_session(&self, id: SessionId, game: &mut Game, winner: Option<PlayerId>) {
        let grants = game.take_rewards(&self.config.rewards);
        if !grants.is_empty() {
            let mut players = self.players.lock();
            for grant in &grants {
                let record = players
                    .entry(grant.player)
                    .or_insert_with(|| Player::new(grant.player, grant.player.to_string()));
                if grant.won {
                    record.win();
                } else {
                    record.lose();
                }
                record.add_gems(grant.gems);
                record.unit_record(grant.unit).add_points(grant.points);
                self.store.save_player(record);
            }
        }

        let summary = SessionSummary {
            turns: game.turn_count(),
            actions: game.action_log().len(),
        };
        let member_players: Vec<PlayerId> = game.members().iter().map(|m| m.player).collect();

        info!(%id, ?winner, turns = summary.turns, "session ended");
        self.sink.publish(LifecycleEvent::SessionEnded {
            session: id,
            winner,
            summary,
        });

        self.sessions.lock().remove(&id);
        let mut in_session = self.in_session.lock();
        for player in member_players {
            in_session.remove(&player);
        }
    }
}

/// Resolve an action selector against the built-ins and a unit's skills.
fn parse_selector(selector: &str, unit: UnitKind) -> EngineResult<PlayerAction> {
    let mut candidates: Vec<(&str, PlayerAction)> = vec![
        ("attack", PlayerAction::Attack),
        ("defend", PlayerAction::Defend),
    ];
    for skill in unit.skills() {
        candidates.push((skill.name(), PlayerAction::Skill(*skill)));
    }
    resolve_name(selector, &candidates)
        .ok_or_else(|| EngineError::invalid(format!("unknown action '{selector}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::skills::SkillKind;

    #[test]
    fn test_parse_selector_builtins_and_skills() {
        assert_eq!(
            parse_selector("attack", UnitKind::Warrior).unwrap(),
            PlayerAction::Attack
        );
        assert_eq!(
            parse_selector("DEF", UnitKind::Warrior).unwrap(),
            PlayerAction::Defend
        );
        assert_eq!(
            parse_selector("bas", UnitKind::Warrior).unwrap(),
            PlayerAction::Skill(SkillKind::Bash)
        );
        assert_eq!(
            parse_selector("deadeye", UnitKind::Gunslinger).unwrap(),
            PlayerAction::Skill(SkillKind::Deadeye)
        );
    }

    #[test]
    fn test_parse_selector_rejects_unknown_and_foreign_skills() {
        assert!(matches!(
            parse_selector("fireball", UnitKind::Warrior),
            Err(EngineError::InvalidAction(_))
        ));
        // Barrage belongs to the Gunslinger, not the Warrior.
        assert!(matches!(
            parse_selector("barrage", UnitKind::Warrior),
            Err(EngineError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_parse_selector_needs_three_chars_for_prefix() {
        assert!(matches!(
            parse_selector("ba", UnitKind::Warrior),
            Err(EngineError::InvalidAction(_))
        ));
    }
}
