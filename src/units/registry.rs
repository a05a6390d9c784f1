//! Name-based catalog lookup.
//!
//! Queries resolve case-insensitively: an exact name always wins, and a
//! prefix of at least three characters matches if it is unambiguous. The
//! unit lookup additionally honors the `"random"` wildcard.

use crate::core::GameRng;
use crate::units::UnitKind;

/// Resolve a query against named candidates.
///
/// Exact (case-insensitive) match first; otherwise a unique prefix of at
/// least 3 characters. Ambiguous prefixes resolve to nothing.
pub fn resolve_name<T: Copy>(query: &str, candidates: &[(&str, T)]) -> Option<T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    for (name, value) in candidates {
        if name.to_lowercase() == query {
            return Some(*value);
        }
    }

    if query.len() < 3 {
        return None;
    }
    let mut matched = None;
    for (name, value) in candidates {
        if name.to_lowercase().starts_with(&query) {
            if matched.is_some() {
                return None; // ambiguous prefix
            }
            matched = Some(*value);
        }
    }
    matched
}

/// The unit catalog's name index, built once at engine startup.
#[derive(Clone, Debug)]
pub struct UnitRegistry {
    entries: Vec<(&'static str, UnitKind)>,
}

impl UnitRegistry {
    /// Build the index over the full roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: UnitKind::ALL.iter().map(|u| (u.name(), *u)).collect(),
        }
    }

    /// Look a unit up by name or unique prefix.
    #[must_use]
    pub fn by_name(&self, query: &str) -> Option<UnitKind> {
        resolve_name(query, &self.entries)
    }

    /// Look a unit up, honoring the `"random"` wildcard.
    pub fn by_name_or_random(&self, query: &str, rng: &mut GameRng) -> Option<UnitKind> {
        if query.trim().eq_ignore_ascii_case("random") {
            return rng.pick(&UnitKind::ALL).copied();
        }
        self.by_name(query)
    }

    /// All units in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = UnitKind> + '_ {
        self.entries.iter().map(|(_, u)| *u)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
