//! The transient value object threaded through damage resolution.

use smallvec::SmallVec;

use crate::game::member::MemberId;

/// One attack or ability use in flight.
///
/// Constructed per use, mutated in place by every pipeline stage and hook,
/// and discarded once its output lines have been collected. Never
/// persisted.
#[derive(Clone, Debug)]
pub struct DamageEvent {
    /// The attacking member.
    pub actor: MemberId,
    /// The member being hit.
    pub target: MemberId,
    /// Base damage; multiplied on crit.
    pub damage: f32,
    /// Flat bonus damage; not multiplied on crit.
    pub bonus: f32,
    /// Whether the hit crits. Hooks may force this before the roll.
    pub crit: bool,
    /// Adjustment added to the crit multiplier; `was_crit` hooks on the
    /// target may lower it.
    pub crit_mul: f32,
    /// Set when the target dodges; later stages are skipped.
    pub cancelled: bool,
    /// Human-readable lines assembled as resolution proceeds.
    pub output: SmallVec<[String; 4]>,
}

impl DamageEvent {
    /// Start an empty event between two members.
    #[must_use]
    pub fn new(actor: MemberId, target: MemberId) -> Self {
        Self {
            actor,
            target,
            damage: 0.0,
            bonus: 0.0,
            crit: false,
            crit_mul: 0.0,
            cancelled: false,
            output: SmallVec::new(),
        }
    }

    /// Total damage carried by the event.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.damage + self.bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_is_inert() {
        let ev = DamageEvent::new(MemberId(0), MemberId(1));
        assert_eq!(ev.total(), 0.0);
        assert!(!ev.crit);
        assert!(!ev.cancelled);
        assert!(ev.output.is_empty());
    }

    #[test]
    fn test_total_sums_damage_and_bonus() {
        let mut ev = DamageEvent::new(MemberId(0), MemberId(1));
        ev.damage = 22.0;
        ev.bonus = 8.0;
        assert_eq!(ev.total(), 30.0);
    }
}
