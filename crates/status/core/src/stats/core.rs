//! Base attributes - the only statistics an entity stores.
//!
//! Primary attributes (STR, CON, DEX, INT, WIL, EGO) and level are the single
//! source of truth. Everything in [`BattleStats`](super::BattleStats) is derived
//! from these, the externally supplied equipment bonuses and active effects.

use super::bonus::Bonus;
use super::category::{StatCategory, StatId};

/// The six primary attributes plus level.
///
/// - **STR**: attack power
/// - **CON**: health, defense, poison and stun resistance
/// - **DEX**: accuracy, evasion, attack speed
/// - **INT**: magic attack, mana
/// - **WIL**: magic defense, mana regeneration, mental resistance
/// - **EGO**: critical strikes, magic attack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub str: i32,
    pub con: i32,
    pub dex: i32,
    pub int: i32,
    pub wil: i32,
    pub ego: i32,
    pub level: i32,
}

impl BaseStats {
    pub fn new(str: i32, con: i32, dex: i32, int: i32, wil: i32, ego: i32, level: i32) -> Self {
        Self {
            str,
            con,
            dex,
            int,
            wil,
            ego,
            level,
        }
    }

    /// Stored value of a primary attribute; `None` for derived statistics.
    pub fn primary(&self, stat: StatId) -> Option<i32> {
        match stat {
            StatId::Str => Some(self.str),
            StatId::Con => Some(self.con),
            StatId::Dex => Some(self.dex),
            StatId::Int => Some(self.int),
            StatId::Wil => Some(self.wil),
            StatId::Ego => Some(self.ego),
            _ => None,
        }
    }

    /// Categories whose stored inputs differ between `self` and `other`.
    ///
    /// A level change touches everything since level feeds several baselines.
    pub fn diff(&self, other: &BaseStats) -> StatCategory {
        if self.level != other.level {
            return StatCategory::everything();
        }
        let mut changed = StatCategory::empty();
        for stat in StatCategory::PRIMARIES.stats() {
            if self.primary(stat) != other.primary(stat) {
                changed |= stat.category();
            }
        }
        changed
    }
}

impl Default for BaseStats {
    /// Default stats: all 10, level 1
    fn default() -> Self {
        Self {
            str: 10,
            con: 10,
            dex: 10,
            int: 10,
            wil: 10,
            ego: 10,
            level: 1,
        }
    }
}

/// Bonuses supplied by collaborators outside the engine (equipment, skill
/// trees, passive cards).
///
/// These are NOT produced by effects; the engine only folds them into the
/// stack ahead of effect contributions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBonuses {
    entries: Vec<(StatId, Bonus)>,
}

impl StatBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stat: StatId, bonus: Bonus) {
        self.entries.push((stat, bonus));
    }

    /// Builder variant of [`add`](Self::add).
    pub fn with(mut self, stat: StatId, bonus: Bonus) -> Self {
        self.add(stat, bonus);
        self
    }

    /// Bonuses targeting one statistic, in insertion order.
    pub fn for_stat(&self, stat: StatId) -> impl Iterator<Item = Bonus> + '_ {
        self.entries
            .iter()
            .filter(move |(s, _)| *s == stat)
            .map(|(_, b)| *b)
    }

    /// Categories touched by any entry.
    pub fn categories(&self) -> StatCategory {
        self.entries
            .iter()
            .fold(StatCategory::empty(), |acc, (s, _)| acc | s.category())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(StatId, Bonus)> for StatBonuses {
    fn from_iter<T: IntoIterator<Item = (StatId, Bonus)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_reports_only_changed_primaries() {
        let a = BaseStats::default();
        let mut b = a;
        b.con = 15;
        b.ego = 3;
        assert_eq!(a.diff(&b), StatCategory::CON | StatCategory::EGO);
    }

    #[test]
    fn level_change_touches_everything() {
        let a = BaseStats::default();
        let mut b = a;
        b.level = 2;
        assert_eq!(a.diff(&b), StatCategory::everything());
    }
}
