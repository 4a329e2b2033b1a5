//! Computed (battle) statistics and their base-derived baselines.
//!
//! These are NOT the source of truth. [`AttributeCalculator`](super::AttributeCalculator)
//! writes them; everything else only reads.

use strum::EnumCount;

use super::category::StatId;
use super::core::BaseStats;

/// The full computed statistic vector of one entity, indexed by [`StatId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleStats {
    values: [i32; StatId::COUNT],
}

impl BattleStats {
    /// All-zero vector; a fresh entity must be run through
    /// [`recompute_all`](crate::engine::StatusEngine::recompute_all) before use.
    pub const fn zeroed() -> Self {
        Self {
            values: [0; StatId::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, stat: StatId) -> i32 {
        self.values[stat.index()]
    }

    #[inline]
    pub(crate) fn set(&mut self, stat: StatId, value: i32) {
        self.values[stat.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatId, i32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| StatId::from_repr(i as u8).map(|s| (s, *v)))
    }

    /// Baseline of `stat` before any bonus is folded in.
    ///
    /// Primary attributes start from the stored base value. Every other
    /// statistic reads the *effective* primaries already present in `self`,
    /// which is sound because inputs always precede their dependents in
    /// ordinal order.
    ///
    /// | stat          | baseline                                  |
    /// |---------------|-------------------------------------------|
    /// | attack        | STR × 1.5                                 |
    /// | accuracy      | DEX + level                               |
    /// | evasion       | DEX × 0.5 + level / 2                     |
    /// | defense       | 10 + (CON - 10) / 2                       |
    /// | magic attack  | INT × 0.8 + EGO × 0.5                     |
    /// | magic defense | WIL × 1.2                                 |
    /// | critical      | EGO / 3 + 1                               |
    /// | attack speed  | 100 + DEX × 0.8 + STR × 0.2               |
    /// | move speed    | 100                                       |
    /// | HP max        | CON × 10 + level × CON / 2                |
    /// | MP max        | (WIL + INT) × 5 + EGO × 2 + level × √WIL  |
    /// | HP regen      | max(1, HP max / 100 + CON / 5)            |
    /// | MP regen      | max(1, MP max / 100 + WIL / 5)            |
    pub fn baseline(&self, stat: StatId, base: &BaseStats) -> i32 {
        let str = self.get(StatId::Str);
        let con = self.get(StatId::Con);
        let dex = self.get(StatId::Dex);
        let int = self.get(StatId::Int);
        let wil = self.get(StatId::Wil);
        let ego = self.get(StatId::Ego);
        let level = base.level;

        match stat {
            StatId::Str => base.str,
            StatId::Con => base.con,
            StatId::Dex => base.dex,
            StatId::Int => base.int,
            StatId::Wil => base.wil,
            StatId::Ego => base.ego,

            StatId::Attack => (str * 15) / 10,
            StatId::Accuracy => dex + level,
            StatId::Evasion => (dex * 5) / 10 + level / 2,
            StatId::Defense => 10 + (con - 10) / 2,
            StatId::MagicAttack => (int * 8) / 10 + (ego * 5) / 10,
            StatId::MagicDefense => (wil * 12) / 10,
            StatId::Critical => ego / 3 + 1,
            StatId::AttackSpeed => 100 + (dex * 8) / 10 + (str * 2) / 10,
            StatId::MoveSpeed => 100,

            StatId::HpMax => con * 10 + (level * con) / 2,
            StatId::MpMax => (wil + int) * 5 + ego * 2 + level * isqrt(wil),
            StatId::HpRegen => (self.get(StatId::HpMax) / 100 + con / 5).max(1),
            StatId::MpRegen => (self.get(StatId::MpMax) / 100 + wil / 5).max(1),
        }
    }
}

impl Default for BattleStats {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Integer square root (floor). Non-positive inputs yield 0.
pub(crate) fn isqrt(n: i32) -> i32 {
    if n <= 0 {
        return 0;
    }
    (n as u32).isqrt() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_primaries(base: &BaseStats) -> BattleStats {
        let mut battle = BattleStats::zeroed();
        for stat in [
            StatId::Str,
            StatId::Con,
            StatId::Dex,
            StatId::Int,
            StatId::Wil,
            StatId::Ego,
        ] {
            let v = battle.baseline(stat, base);
            battle.set(stat, v);
        }
        battle
    }

    #[test]
    fn default_entity_baselines() {
        let base = BaseStats::default();
        let battle = with_primaries(&base);

        // 10 × 1.5
        assert_eq!(battle.baseline(StatId::Attack, &base), 15);
        // 10 + 1
        assert_eq!(battle.baseline(StatId::Accuracy, &base), 11);
        // 10 × 10 + 1 × 10 / 2 = 105
        assert_eq!(battle.baseline(StatId::HpMax, &base), 105);
        // (10 + 10) × 5 + 10 × 2 + 1 × 3 = 123
        assert_eq!(battle.baseline(StatId::MpMax, &base), 123);
    }

    #[test]
    fn regen_reads_computed_maximum() {
        let base = BaseStats::default();
        let mut battle = with_primaries(&base);
        battle.set(StatId::HpMax, 1000);
        // 1000 / 100 + 10 / 5 = 12
        assert_eq!(battle.baseline(StatId::HpRegen, &base), 12);
    }

    #[test]
    fn isqrt_floors() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(-4), 0);
        assert_eq!(isqrt(15), 3);
        assert_eq!(isqrt(16), 4);
    }
}
