//! Player identification and the persistent player record.
//!
//! A [`Player`] is everything the engine tracks about a person across
//! sessions: win/loss tallies, the gem balance, and per-unit mastery
//! points. The engine only produces deltas into this record; durable
//! storage belongs to a [`PlayerStore`] collaborator.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::units::UnitKind;

/// Type-safe player identifier.
///
/// Opaque to the engine; embedders map it to whatever identity their
/// platform uses.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Mastery record for one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Mastery points accumulated with this unit.
    pub points: u32,
}

impl UnitRecord {
    /// Add mastery points.
    pub fn add_points(&mut self, points: u32) {
        self.points += points;
    }
}

/// Persistent per-player record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier.
    pub id: PlayerId,
    /// Display name used in session output.
    pub username: String,
    /// Ranked wins.
    pub wins: u32,
    /// Ranked losses.
    pub losses: u32,
    /// Currency balance.
    pub gems: u32,
    unit_records: FxHashMap<UnitKind, UnitRecord>,
}

impl Player {
    /// Create a fresh record.
    #[must_use]
    pub fn new(id: PlayerId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            wins: 0,
            losses: 0,
            gems: 0,
            unit_records: FxHashMap::default(),
        }
    }

    /// Tally a ranked win.
    pub fn win(&mut self) {
        self.wins += 1;
    }

    /// Tally a ranked loss.
    pub fn lose(&mut self) {
        self.losses += 1;
    }

    /// Add currency.
    pub fn add_gems(&mut self, gems: u32) {
        self.gems += gems;
    }

    /// Mastery record for a unit, created on first access.
    pub fn unit_record(&mut self, unit: UnitKind) -> &mut UnitRecord {
        self.unit_records.entry(unit).or_default()
    }

    /// Mastery points for a unit (0 if never played).
    #[must_use]
    pub fn unit_points(&self, unit: UnitKind) -> u32 {
        self.unit_records.get(&unit).map_or(0, |r| r.points)
    }
}

/// Persistence boundary.
///
/// Called at reward-application time with the updated record. The engine
/// never awaits durable completion; implementations are expected to hand
/// the record off (a channel, a write-behind cache) and return.
pub trait PlayerStore: Send + Sync {
    /// Persist one player record.
    fn save_player(&self, player: &Player);
}

/// A store that discards records; useful for unranked-only embedders.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

impl PlayerStore for NullStore {
    fn save_player(&self, _player: &Player) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies() {
        let mut player = Player::new(PlayerId::new(1), "alice");
        player.win();
        player.win();
        player.lose();
        player.add_gems(35);

        assert_eq!(player.wins, 2);
        assert_eq!(player.losses, 1);
        assert_eq!(player.gems, 35);
    }

    #[test]
    fn test_unit_record_created_on_first_access() {
        let mut player = Player::new(PlayerId::new(2), "bob");
        assert_eq!(player.unit_points(UnitKind::Warrior), 0);

        player.unit_record(UnitKind::Warrior).add_points(180);
        player.unit_record(UnitKind::Warrior).add_points(20);

        assert_eq!(player.unit_points(UnitKind::Warrior), 200);
        assert_eq!(player.unit_points(UnitKind::Gunslinger), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PlayerId::new(7)), "Player 7");
    }

    #[test]
    fn test_serialization() {
        let mut player = Player::new(PlayerId::new(3), "carol");
        player.unit_record(UnitKind::Duelist).add_points(90);

        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, back);
    }
}
