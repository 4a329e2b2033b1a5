//! Statistic identifiers, recompute categories and the dependency graph.
//!
//! Each [`StatId`] owns exactly one [`StatCategory`] bit. Effects declare the
//! categories they touch; the calculator expands a changed set along
//! [`StatId::dependents`] until nothing new changes.
//!
//! The graph is acyclic by construction: every dependent has a strictly
//! greater ordinal than the statistic it depends on, so one sweep in ordinal
//! order visits each statistic after all of its inputs.

use bitflags::bitflags;
use strum::IntoEnumIterator;

use super::bonus::StatBounds;

/// A single computed statistic.
///
/// Declaration order is a topological order of the dependency graph.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum StatId {
    // ===== effective primary attributes =====
    Str,
    Con,
    Dex,
    Int,
    Wil,
    Ego,

    // ===== combat figures =====
    Attack,
    Accuracy,
    Evasion,
    Defense,
    MagicAttack,
    MagicDefense,
    Critical,
    AttackSpeed,
    MoveSpeed,

    // ===== resource pools =====
    HpMax,
    MpMax,
    HpRegen,
    MpRegen,
}

impl StatId {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The category bit owned by this statistic.
    #[inline]
    pub const fn category(self) -> StatCategory {
        StatCategory::from_bits_retain(1 << self as u32)
    }

    pub const fn is_primary(self) -> bool {
        matches!(
            self,
            Self::Str | Self::Con | Self::Dex | Self::Int | Self::Wil | Self::Ego
        )
    }

    /// Statistics whose baseline reads this one.
    pub const fn dependents(self) -> StatCategory {
        match self {
            Self::Str => StatCategory::ATTACK.union(StatCategory::ATTACK_SPEED),
            Self::Con => StatCategory::DEFENSE
                .union(StatCategory::HP_MAX)
                .union(StatCategory::HP_REGEN),
            Self::Dex => StatCategory::ACCURACY
                .union(StatCategory::EVASION)
                .union(StatCategory::ATTACK_SPEED),
            Self::Int => StatCategory::MAGIC_ATTACK.union(StatCategory::MP_MAX),
            Self::Wil => StatCategory::MAGIC_DEFENSE
                .union(StatCategory::MP_MAX)
                .union(StatCategory::MP_REGEN),
            Self::Ego => StatCategory::MAGIC_ATTACK
                .union(StatCategory::CRITICAL)
                .union(StatCategory::MP_MAX),
            Self::HpMax => StatCategory::HP_REGEN,
            Self::MpMax => StatCategory::MP_REGEN,
            _ => StatCategory::empty(),
        }
    }

    pub const fn bounds(self) -> StatBounds {
        match self {
            Self::Str | Self::Con | Self::Dex | Self::Int | Self::Wil | Self::Ego => {
                StatBounds::PRIMARY
            }
            Self::Critical => StatBounds::PERCENT,
            Self::AttackSpeed => StatBounds::ATTACK_SPEED,
            Self::MoveSpeed => StatBounds::MOVE_SPEED,
            Self::HpMax | Self::MpMax => StatBounds::RESOURCE_MAX,
            _ => StatBounds::COMBAT,
        }
    }
}

bitflags! {
    /// Set of statistics that need recomputation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct StatCategory: u32 {
        const STR           = 1 << 0;
        const CON           = 1 << 1;
        const DEX           = 1 << 2;
        const INT           = 1 << 3;
        const WIL           = 1 << 4;
        const EGO           = 1 << 5;
        const ATTACK        = 1 << 6;
        const ACCURACY      = 1 << 7;
        const EVASION       = 1 << 8;
        const DEFENSE       = 1 << 9;
        const MAGIC_ATTACK  = 1 << 10;
        const MAGIC_DEFENSE = 1 << 11;
        const CRITICAL      = 1 << 12;
        const ATTACK_SPEED  = 1 << 13;
        const MOVE_SPEED    = 1 << 14;
        const HP_MAX        = 1 << 15;
        const MP_MAX        = 1 << 16;
        const HP_REGEN      = 1 << 17;
        const MP_REGEN      = 1 << 18;

        const PRIMARIES = Self::STR.bits()
            | Self::CON.bits()
            | Self::DEX.bits()
            | Self::INT.bits()
            | Self::WIL.bits()
            | Self::EGO.bits();
    }
}

impl StatCategory {
    /// Every statistic.
    pub fn everything() -> Self {
        Self::all()
    }

    /// Iterates the statistics in this set in ordinal (topological) order.
    pub fn stats(self) -> impl Iterator<Item = StatId> {
        StatId::iter().filter(move |stat| self.contains(stat.category()))
    }

    /// Transitive closure of this set along the dependency graph.
    pub fn closure(self) -> Self {
        let mut closed = self;
        for stat in StatId::iter() {
            if closed.contains(stat.category()) {
                closed |= stat.dependents();
            }
        }
        closed
    }
}

impl From<StatId> for StatCategory {
    fn from(stat: StatId) -> Self {
        stat.category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn every_stat_owns_a_distinct_named_bit() {
        let mut seen = StatCategory::empty();
        for stat in StatId::iter() {
            let bit = stat.category();
            assert!(!bit.is_empty(), "{stat} has no category bit");
            assert!(!seen.intersects(bit), "{stat} shares a bit");
            assert!(StatCategory::all().contains(bit), "{stat} bit is unnamed");
            seen |= bit;
        }
        assert_eq!(seen.bits().count_ones() as usize, StatId::COUNT);
    }

    #[test]
    fn dependents_always_come_later() {
        for stat in StatId::iter() {
            for dependent in stat.dependents().stats() {
                assert!(
                    dependent > stat,
                    "{dependent} depends on {stat} but is ordered before it"
                );
            }
        }
    }

    #[test]
    fn cascade_depth_is_bounded() {
        fn depth(stat: StatId) -> usize {
            stat.dependents()
                .stats()
                .map(|d| 1 + depth(d))
                .max()
                .unwrap_or(0)
        }
        for stat in StatId::iter() {
            assert!(depth(stat) < crate::config::EngineConfig::MAX_CASCADE_DEPTH);
        }
    }

    #[test]
    fn closure_follows_two_hops() {
        let closed = StatCategory::CON.closure();
        assert!(closed.contains(StatCategory::HP_MAX));
        assert!(closed.contains(StatCategory::HP_REGEN));
        assert!(!closed.contains(StatCategory::MP_MAX));
    }
}
