//! Sparse numeric attribute tables with additive composition.
//!
//! Every numeric property of a unit or member (health caps, attack power,
//! crit chance, energy) lives in a `Stats` table keyed by [`Stat`]. Values
//! from multiple sources (unit base stats, per-turn regeneration, active
//! buffs) are combined by summing.
//!
//! ## Invariants
//!
//! - Absent keys read as `0.0`.
//! - `Stats` never clamps; callers own their own bounds (health caps,
//!   energy caps, probability ranges).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Key into a [`Stats`] table.
///
/// The engine interprets these during damage resolution and turn
/// bookkeeping; the unit catalog assigns the base values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// Health ceiling; members spawn at this value.
    MaxHealth,
    /// Health regained at each of the member's turn starts.
    HealthPerTurn,
    /// Physical attack scaling; basic attack damage equals this.
    AttackPower,
    /// Magical scaling used by passives (Phasebreaker).
    AbilityPower,
    /// Skill scaling used by active skills.
    SkillPower,
    /// Current energy. Skills deduct from this.
    Energy,
    /// Energy ceiling.
    MaxEnergy,
    /// Energy regained at each of the member's turn starts.
    EnergyPerTurn,
    /// Probability in `[0, 1]` that an attack crits.
    CritChance,
    /// Bonus damage fraction applied on crit.
    CritDamage,
    /// Probability in `[0, 1]` that an incoming attack is dodged.
    Dodge,
    /// Fraction of post-shield damage negated.
    Resist,
    /// Fraction of dealt health damage returned to the actor as healing.
    LifeSteal,
}

/// A sparse stat table.
///
/// ## Example
///
/// ```
/// use rust_arena::core::{Stat, Stats};
///
/// let base = Stats::new()
///     .with(Stat::MaxHealth, 775.0)
///     .with(Stat::AttackPower, 22.0);
/// let buff = Stats::new().with(Stat::AttackPower, 5.0);
///
/// let combined = base.plus(&buff);
/// assert_eq!(combined.get(Stat::AttackPower), 27.0);
/// assert_eq!(combined.get(Stat::Dodge), 0.0); // absent keys read 0
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    values: FxHashMap<Stat, f32>,
}

impl Stats {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value; absent keys read `0.0`.
    #[must_use]
    pub fn get(&self, key: Stat) -> f32 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }

    /// Read a value truncated toward zero.
    #[must_use]
    pub fn get_int(&self, key: Stat) -> i32 {
        self.get(key) as i32
    }

    /// Set a value, replacing any previous one.
    pub fn put(&mut self, key: Stat, value: f32) {
        self.values.insert(key, value);
    }

    /// Add a delta to a value (inserting from 0 if absent).
    pub fn add(&mut self, key: Stat, delta: f32) {
        *self.values.entry(key).or_insert(0.0) += delta;
    }

    /// Chaining form of [`put`](Self::put) for catalog literals.
    #[must_use]
    pub fn with(mut self, key: Stat, value: f32) -> Self {
        self.put(key, value);
        self
    }

    /// Non-destructive key-wise sum over the union of keys.
    #[must_use]
    pub fn plus(&self, other: &Stats) -> Stats {
        let mut out = self.clone();
        for (&key, &value) in &other.values {
            out.add(key, value);
        }
        out
    }

    /// Iterate over present `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, f32)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    /// Number of present keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_keys_read_zero() {
        let stats = Stats::new();
        assert_eq!(stats.get(Stat::AttackPower), 0.0);
        assert_eq!(stats.get_int(Stat::MaxHealth), 0);
    }

    #[test]
    fn test_put_and_get() {
        let mut stats = Stats::new();
        stats.put(Stat::AttackPower, 22.0);
        assert_eq!(stats.get(Stat::AttackPower), 22.0);

        stats.put(Stat::AttackPower, 19.0);
        assert_eq!(stats.get(Stat::AttackPower), 19.0);
    }

    #[test]
    fn test_add_inserts_from_zero() {
        let mut stats = Stats::new();
        stats.add(Stat::AbilityPower, 7.0);
        stats.add(Stat::AbilityPower, 7.0);
        assert_eq!(stats.get(Stat::AbilityPower), 14.0);
    }

    #[test]
    fn test_get_int_truncates() {
        let mut stats = Stats::new();
        stats.put(Stat::CritChance, 0.99);
        assert_eq!(stats.get_int(Stat::CritChance), 0);

        stats.put(Stat::MaxHealth, 750.7);
        assert_eq!(stats.get_int(Stat::MaxHealth), 750);
    }

    #[test]
    fn test_plus_sums_union_of_keys() {
        let a = Stats::new()
            .with(Stat::MaxHealth, 700.0)
            .with(Stat::AttackPower, 20.0);
        let b = Stats::new()
            .with(Stat::AttackPower, 5.0)
            .with(Stat::Dodge, 0.4);

        let sum = a.plus(&b);

        // a.plus(b).get(k) == a.get(k) + b.get(k) for every key
        for key in [
            Stat::MaxHealth,
            Stat::AttackPower,
            Stat::Dodge,
            Stat::LifeSteal,
        ] {
            assert_eq!(sum.get(key), a.get(key) + b.get(key));
        }
    }

    #[test]
    fn test_plus_is_non_destructive() {
        let a = Stats::new().with(Stat::AttackPower, 20.0);
        let b = Stats::new().with(Stat::AttackPower, 5.0);

        let _ = a.plus(&b);

        assert_eq!(a.get(Stat::AttackPower), 20.0);
        assert_eq!(b.get(Stat::AttackPower), 5.0);
    }

    #[test]
    fn test_no_implicit_clamping() {
        let mut stats = Stats::new();
        stats.add(Stat::Energy, -50.0);
        assert_eq!(stats.get(Stat::Energy), -50.0);
    }

    #[test]
    fn test_serialization() {
        let stats = Stats::new()
            .with(Stat::MaxHealth, 750.0)
            .with(Stat::CritChance, 0.15);
        let json = serde_json::to_string(&stats).unwrap();
        let back: Stats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, back);
    }
}
