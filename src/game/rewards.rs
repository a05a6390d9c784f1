//! End-of-session reward computation.
//!
//! Rewards are a pure function of `(turn_count, rng draws)` and are
//! latched: a finished session yields its grants exactly once, at the
//! `Finished` transition. Only ranked modes past the turn threshold pay
//! out. The engine applies the grants to player records and hands each
//! updated record to the persistence boundary.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, RewardConfig};
use crate::game::session::{Game, SessionState};
use crate::units::UnitKind;

/// One member's end-of-session reward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGrant {
    /// The rewarded player.
    pub player: PlayerId,
    /// The unit they played, for mastery points.
    pub unit: UnitKind,
    /// Whether this member won.
    pub won: bool,
    /// Currency granted.
    pub gems: u32,
    /// Unit mastery points granted.
    pub points: u32,
}

impl Game {
    /// Compute this session's reward grants, exactly once.
    ///
    /// Returns an empty list when the session is not finished, the mode is
    /// unranked, the session was too short, there is no sole survivor, or
    /// the rewards were already taken. Draw order is fixed (winner gems,
    /// winner points, then each defeated member's gems and points in join
    /// order), so a given session RNG always yields the same grants.
    pub fn take_rewards(&mut self, config: &RewardConfig) -> Vec<RewardGrant> {
        if self.rewarded
            || self.state() != SessionState::Finished
            || !self.mode().ranked()
            || self.turn_count() <= config.min_turns
        {
            return Vec::new();
        }
        let Some(winner) = self.winner() else {
            return Vec::new();
        };
        self.rewarded = true;

        let turn_share = (self.turn_count() / 2) as i32;
        let mut grants = Vec::new();

        let winner_unit = self
            .members()
            .iter()
            .find(|m| m.player == winner)
            .map(|m| m.unit);
        if let Some(unit) = winner_unit {
            let (draw_lo, draw_hi) = config.winner_gem_draw;
            let (min, max) = config.winner_gem_bounds;
            let gems = (turn_share + self.rng.between(draw_lo, draw_hi)).clamp(min, max);
            let (point_lo, point_hi) = config.winner_point_draw;
            let points = self.rng.between(point_lo, point_hi);
            grants.push(RewardGrant {
                player: winner,
                unit,
                won: true,
                gems: gems.max(0) as u32,
                points: points.max(0) as u32,
            });
        }

        let defeated: Vec<(PlayerId, UnitKind)> = self
            .members()
            .iter()
            .filter(|m| !m.alive())
            .map(|m| (m.player, m.unit))
            .collect();
        for (player, unit) in defeated {
            let (draw_lo, draw_hi) = config.loser_gem_draw;
            let (min, max) = config.loser_gem_bounds;
            let gems = (turn_share + self.rng.between(draw_lo, draw_hi)).clamp(min, max);
            let (point_lo, point_hi) = config.loser_point_draw;
            let points = self.rng.between(point_lo, point_hi);
            grants.push(RewardGrant {
                player,
                unit,
                won: false,
                gems: gems.max(0) as u32,
                points: points.max(0) as u32,
            });
        }

        grants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameMode, GameRng, SessionId, WinPolicy};
    use crate::game::member::MemberId;
    use crate::game::session::PlayerAction;

    fn finished_duel(seed: u64) -> Game {
        let mut game = Game::new(
            SessionId(9),
            GameMode::Duel,
            WinPolicy::SoleSurvivor,
            vec![
                (PlayerId::new(1), "alice".to_string(), UnitKind::Warrior),
                (PlayerId::new(2), "bob".to_string(), UnitKind::Duelist),
            ],
            GameRng::new(seed),
        );
        game.start().unwrap();
        // Trade defends until past the reward threshold, then finish.
        for _ in 0..5 {
            game.act(MemberId(0), PlayerAction::Defend).unwrap();
            game.act(MemberId(1), PlayerAction::Defend).unwrap();
        }
        game.members[1].health = 0.5;
        game.members[1].defensive = false;
        game.act(MemberId(0), PlayerAction::Attack).unwrap();
        game
    }

    #[test]
    fn test_grants_follow_configured_bounds() {
        let config = RewardConfig::default();
        let mut game = finished_duel(42);
        assert!(game.turn_count() > config.min_turns);

        let grants = game.take_rewards(&config);
        assert_eq!(grants.len(), 2);

        let winner = &grants[0];
        assert!(winner.won);
        assert_eq!(winner.player, PlayerId::new(1));
        assert_eq!(winner.unit, UnitKind::Warrior);
        let turn_share = (game.turn_count() / 2) as i32;
        let lo = (turn_share + 20).clamp(10, 80);
        let hi = (turn_share + 40).clamp(10, 80);
        assert!((lo..=hi).contains(&(winner.gems as i32)));
        assert!((160..=200).contains(&(winner.points as i32)));

        let loser = &grants[1];
        assert!(!loser.won);
        assert_eq!(loser.player, PlayerId::new(2));
        assert!((5..=40).contains(&(loser.gems as i32)));
        assert!((80..=100).contains(&(loser.points as i32)));
    }

    #[test]
    fn test_rewards_are_latched() {
        let config = RewardConfig::default();
        let mut game = finished_duel(42);

        let first = game.take_rewards(&config);
        assert!(!first.is_empty());
        let second = game.take_rewards(&config);
        assert!(second.is_empty());
    }

    #[test]
    fn test_rewards_are_deterministic() {
        let config = RewardConfig::default();
        let mut a = finished_duel(1234);
        let mut b = finished_duel(1234);
        assert_eq!(a.take_rewards(&config), b.take_rewards(&config));
    }

    #[test]
    fn test_short_sessions_pay_nothing() {
        let config = RewardConfig::default();
        let mut game = Game::new(
            SessionId(10),
            GameMode::Duel,
            WinPolicy::SoleSurvivor,
            vec![
                (PlayerId::new(1), "alice".to_string(), UnitKind::Warrior),
                (PlayerId::new(2), "bob".to_string(), UnitKind::Warrior),
            ],
            GameRng::new(5),
        );
        game.start().unwrap();
        game.members[1].health = 0.5;
        game.act(MemberId(0), PlayerAction::Attack).unwrap();

        assert!(game.turn_count() <= config.min_turns);
        assert!(game.take_rewards(&config).is_empty());
    }

    #[test]
    fn test_unfinished_sessions_pay_nothing() {
        let config = RewardConfig::default();
        let mut game = Game::new(
            SessionId(11),
            GameMode::Duel,
            WinPolicy::SoleSurvivor,
            vec![
                (PlayerId::new(1), "alice".to_string(), UnitKind::Warrior),
                (PlayerId::new(2), "bob".to_string(), UnitKind::Warrior),
            ],
            GameRng::new(5),
        );
        game.start().unwrap();
        assert!(game.take_rewards(&config).is_empty());
    }
}
