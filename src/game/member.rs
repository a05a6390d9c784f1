//! A player's presence inside one session.
//!
//! A [`Member`] owns the mutable combat state for one player: the base
//! stat aggregate (including current energy), health and shield pools, the
//! defensive stance, the ordered buff list, and a [`MemberVars`] scratch
//! store where unit passives and skills keep their per-member state.
//! Members are created when a session forms and dropped with it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Cooldown, PlayerId, Stacker, Stat, Stats};
use crate::modifiers::{Buff, BuffKind};
use crate::units::UnitKind;

/// Index of a member within its session, in join order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub u8);

impl MemberId {
    /// Raw 0-based index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Member {}", self.0)
    }
}

/// A typed value in the scratch store.
#[derive(Clone, Debug, PartialEq)]
pub enum VarValue {
    Cooldown(Cooldown),
    Stacker(Stacker),
    Int(i32),
    Flag(bool),
}

/// Per-member, per-unit scratch storage.
///
/// Keyed by `(unit, name)` so a unit's passive and skill state survives
/// across actions without leaking into [`Stats`]. Slots are created lazily
/// with a caller-declared default on first access.
#[derive(Clone, Debug, Default)]
pub struct MemberVars {
    values: FxHashMap<(UnitKind, &'static str), VarValue>,
}

impl MemberVars {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw read access; `None` until the slot is first created.
    #[must_use]
    pub fn get(&self, unit: UnitKind, name: &'static str) -> Option<&VarValue> {
        self.values.get(&(unit, name))
    }

    /// A cooldown slot, created ready with the given total.
    pub fn cooldown(&mut self, unit: UnitKind, name: &'static str, total: u32) -> &mut Cooldown {
        let slot = self
            .values
            .entry((unit, name))
            .or_insert_with(|| VarValue::Cooldown(Cooldown::new(total)));
        if !matches!(slot, VarValue::Cooldown(_)) {
            *slot = VarValue::Cooldown(Cooldown::new(total));
        }
        match slot {
            VarValue::Cooldown(cd) => cd,
            _ => unreachable!("slot normalized to Cooldown above"),
        }
    }

    /// A stacker slot, created empty with the given limit.
    pub fn stacker(&mut self, unit: UnitKind, name: &'static str, limit: u32) -> &mut Stacker {
        let slot = self
            .values
            .entry((unit, name))
            .or_insert_with(|| VarValue::Stacker(Stacker::new(limit)));
        if !matches!(slot, VarValue::Stacker(_)) {
            *slot = VarValue::Stacker(Stacker::new(limit));
        }
        match slot {
            VarValue::Stacker(s) => s,
            _ => unreachable!("slot normalized to Stacker above"),
        }
    }

    /// An integer counter slot, created at 0.
    pub fn counter(&mut self, unit: UnitKind, name: &'static str) -> &mut i32 {
        let slot = self
            .values
            .entry((unit, name))
            .or_insert(VarValue::Int(0));
        if !matches!(slot, VarValue::Int(_)) {
            *slot = VarValue::Int(0);
        }
        match slot {
            VarValue::Int(v) => v,
            _ => unreachable!("slot normalized to Int above"),
        }
    }

    /// A boolean flag slot, created false.
    pub fn flag(&mut self, unit: UnitKind, name: &'static str) -> &mut bool {
        let slot = self
            .values
            .entry((unit, name))
            .or_insert(VarValue::Flag(false));
        if !matches!(slot, VarValue::Flag(_)) {
            *slot = VarValue::Flag(false);
        }
        match slot {
            VarValue::Flag(v) => v,
            _ => unreachable!("slot normalized to Flag above"),
        }
    }

    /// Read a counter without creating its slot.
    #[must_use]
    pub fn peek_counter(&self, unit: UnitKind, name: &'static str) -> i32 {
        match self.values.get(&(unit, name)) {
            Some(VarValue::Int(v)) => *v,
            _ => 0,
        }
    }

    /// Tick every cooldown slot once.
    ///
    /// Returns the names that just became ready, sorted for deterministic
    /// notification order.
    pub fn tick_cooldowns(&mut self) -> Vec<&'static str> {
        let mut ready = Vec::new();
        for ((_, name), value) in self.values.iter_mut() {
            if let VarValue::Cooldown(cd) = value {
                if cd.count() {
                    ready.push(*name);
                }
            }
        }
        ready.sort_unstable();
        ready
    }
}

/// One player's combat state inside a session.
#[derive(Clone, Debug)]
pub struct Member {
    /// Position in join order; doubles as the session index.
    pub id: MemberId,
    /// The player behind this member.
    pub player: PlayerId,
    /// Display name used in output lines.
    pub username: String,
    /// The unit being played.
    pub unit: UnitKind,
    base: Stats,
    /// Current health; the member is alive while this is positive.
    pub health: f32,
    /// Damage absorbed before health.
    pub shield: f32,
    /// Defensive stance flag; grants flat resist until the next own turn.
    pub defensive: bool,
    /// Scratch store for passive and skill state.
    pub vars: MemberVars,
    buffs: Vec<Buff>,
}

impl Member {
    /// Create a member at full health and energy.
    #[must_use]
    pub fn new(id: MemberId, player: PlayerId, username: impl Into<String>, unit: UnitKind) -> Self {
        let mut base = unit.base_stats();
        let health = base.get(Stat::MaxHealth);
        let energy = base.get(Stat::MaxEnergy);
        base.put(Stat::Energy, energy);
        Self {
            id,
            player,
            username: username.into(),
            unit,
            base,
            health,
            shield: 0.0,
            defensive: false,
            vars: MemberVars::new(),
            buffs: Vec::new(),
        }
    }

    /// Effective stats: the base aggregate plus every active buff's
    /// contribution.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.buffs
            .iter()
            .fold(self.base.clone(), |acc, buff| acc.plus(&buff.stats()))
    }

    /// The mutable base aggregate, for permanent stat gains.
    pub fn base_mut(&mut self) -> &mut Stats {
        &mut self.base
    }

    /// Alive while health is positive.
    #[must_use]
    pub fn alive(&self) -> bool {
        self.health > 0.0
    }

    /// Current energy.
    #[must_use]
    pub fn energy(&self) -> f32 {
        self.base.get(Stat::Energy)
    }

    /// Set energy, floored at 0.
    pub fn set_energy(&mut self, energy: f32) {
        self.base.put(Stat::Energy, energy.max(0.0));
    }

    /// Deduct an energy cost.
    pub fn spend_energy(&mut self, cost: f32) {
        let energy = self.energy();
        self.set_energy(energy - cost);
    }

    /// Regain energy, capped at MaxEnergy.
    pub fn gain_energy(&mut self, amount: f32) {
        let cap = self.stats().get(Stat::MaxEnergy);
        let energy = (self.energy() + amount).min(cap);
        self.set_energy(energy);
    }

    /// Heal up to max health; returns the amount actually applied.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let cap = self.stats().get(Stat::MaxHealth);
        let applied = amount.max(0.0).min((cap - self.health).max(0.0));
        self.health += applied;
        applied
    }

    /// Add shield and return the output line describing it.
    pub fn add_shield(&mut self, amount: f32) -> String {
        let amount = amount.max(0.0);
        self.shield += amount;
        format!("{} gains a {amount:.0} damage shield.", self.username)
    }

    /// Active buffs in application order.
    #[must_use]
    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    /// Whether a buff of the given kind is active.
    #[must_use]
    pub fn has_buff(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.kind == kind)
    }

    /// Whether the member is silenced (cannot use skills).
    #[must_use]
    pub fn silenced(&self) -> bool {
        self.has_buff(BuffKind::Silence)
    }

    /// Apply a buff; returns the resulting stack count.
    ///
    /// Re-applying a kind the member already carries refreshes its
    /// duration and power in place (keeping its position in application
    /// order); stackable kinds also gain a stack.
    pub fn apply_buff(&mut self, buff: Buff) -> u32 {
        if let Some(existing) = self.buffs.iter_mut().find(|b| b.kind == buff.kind) {
            existing.remaining_turns = buff.remaining_turns;
            existing.power = buff.power;
            existing.source = buff.source;
            if buff.kind.stackable() {
                existing.stacks += 1;
            }
            existing.stacks
        } else {
            let stacks = buff.stacks;
            self.buffs.push(buff);
            stacks
        }
    }

    /// Remove a buff early (cleansing); returns whether one was removed.
    pub fn remove_buff(&mut self, kind: BuffKind) -> bool {
        let before = self.buffs.len();
        self.buffs.retain(|b| b.kind != kind);
        self.buffs.len() != before
    }

    /// Tick buff durations at this member's turn start.
    ///
    /// Expired buffs are removed; returns a fade line for each.
    pub fn tick_buffs(&mut self) -> Vec<String> {
        let mut notes = Vec::new();
        for buff in &mut self.buffs {
            buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
        }
        let username = self.username.clone();
        self.buffs.retain(|buff| {
            if buff.remaining_turns == 0 {
                notes.push(format!("{username}'s {} faded.", buff.kind.name()));
                false
            } else {
                true
            }
        });
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(unit: UnitKind) -> Member {
        Member::new(MemberId(0), PlayerId::new(1), "tester", unit)
    }

    #[test]
    fn test_new_member_is_full() {
        let m = member(UnitKind::Warrior);
        assert_eq!(m.health, 775.0);
        assert_eq!(m.energy(), 125.0);
        assert!(m.alive());
        assert!(!m.defensive);
    }

    #[test]
    fn test_energy_floors_and_caps() {
        let mut m = member(UnitKind::Warrior);
        m.spend_energy(200.0);
        assert_eq!(m.energy(), 0.0);

        m.gain_energy(25.0);
        assert_eq!(m.energy(), 25.0);
        m.gain_energy(500.0);
        assert_eq!(m.energy(), 125.0);
    }

    #[test]
    fn test_heal_caps_at_max_health() {
        let mut m = member(UnitKind::Duelist);
        m.health = 700.0;
        assert_eq!(m.heal(30.0), 30.0);
        assert_eq!(m.heal(100.0), 20.0);
        assert_eq!(m.health, 750.0);
    }

    #[test]
    fn test_buff_stats_merge() {
        let mut m = member(UnitKind::Gunslinger);
        m.apply_buff(Buff::new(BuffKind::Roll, MemberId(0), 2, 0.4));
        assert_eq!(m.stats().get(Stat::Dodge), 0.4);
        // The base aggregate is untouched.
        assert_eq!(m.base_mut().get(Stat::Dodge), 0.0);
    }

    #[test]
    fn test_reapply_refreshes_non_stackable() {
        let mut m = member(UnitKind::Gunslinger);
        m.apply_buff(Buff::new(BuffKind::Roll, MemberId(0), 2, 0.4));
        {
            let buff = &mut m.buffs[0];
            buff.remaining_turns = 1;
        }
        let stacks = m.apply_buff(Buff::new(BuffKind::Roll, MemberId(0), 2, 0.5));
        assert_eq!(stacks, 1);
        assert_eq!(m.buffs().len(), 1);
        assert_eq!(m.buffs()[0].remaining_turns, 2);
        assert_eq!(m.buffs()[0].power, 0.5);
    }

    #[test]
    fn test_reapply_stacks_stackable() {
        let mut m = member(UnitKind::Berserker);
        assert_eq!(m.apply_buff(Buff::new(BuffKind::Rage, MemberId(0), 3, 5.7)), 1);
        assert_eq!(m.apply_buff(Buff::new(BuffKind::Rage, MemberId(0), 3, 5.7)), 2);
        assert_eq!(m.buffs().len(), 1);
        assert_eq!(m.buffs()[0].stacks, 2);
    }

    #[test]
    fn test_remove_buff_cleanses_early() {
        let mut m = member(UnitKind::Warrior);
        m.apply_buff(Buff::new(BuffKind::Silence, MemberId(1), 2, 0.0));
        assert!(m.silenced());

        assert!(m.remove_buff(BuffKind::Silence));
        assert!(!m.silenced());
        assert!(!m.remove_buff(BuffKind::Silence));
    }

    #[test]
    fn test_tick_removes_expired() {
        let mut m = member(UnitKind::Gunslinger);
        m.apply_buff(Buff::new(BuffKind::Roll, MemberId(0), 1, 0.4));
        m.apply_buff(Buff::new(BuffKind::Silence, MemberId(1), 2, 0.0));

        let notes = m.tick_buffs();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("Roll"));
        assert!(m.silenced());

        let notes = m.tick_buffs();
        assert_eq!(notes.len(), 1);
        assert!(!m.silenced());
        assert!(m.buffs().is_empty());
    }

    #[test]
    fn test_vars_lazy_defaults() {
        let mut m = member(UnitKind::Warrior);
        assert!(m.vars.get(UnitKind::Warrior, "momentum").is_none());

        assert_eq!(m.vars.peek_counter(UnitKind::Warrior, "count"), 0);
        *m.vars.counter(UnitKind::Warrior, "count") = 3;
        assert_eq!(m.vars.peek_counter(UnitKind::Warrior, "count"), 3);

        let cd = m.vars.cooldown(UnitKind::Warrior, "Bash", 4);
        assert!(cd.is_done());
        cd.start();
        assert_eq!(cd.remaining(), 4);
    }

    #[test]
    fn test_tick_cooldowns_reports_ready_once() {
        let mut m = member(UnitKind::Warrior);
        m.vars.cooldown(UnitKind::Warrior, "Bash", 2).start();

        assert!(m.vars.tick_cooldowns().is_empty());
        assert_eq!(m.vars.tick_cooldowns(), vec!["Bash"]);
        assert!(m.vars.tick_cooldowns().is_empty());
    }
}
