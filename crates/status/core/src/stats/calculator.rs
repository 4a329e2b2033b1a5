//! Derived-statistic recomputation.
//!
//! ```text
//! value(stat) = clamp(stack(baseline(stat), equipment ++ effects), bounds(stat))
//! ```
//!
//! A request names the categories whose inputs may have changed. The
//! calculator walks statistics in ordinal order (a topological order of the
//! dependency graph), recomputes the requested ones, and adds the dependents
//! of every statistic whose value actually moved. Dependents always sit later
//! in the walk, so one pass settles the whole cascade.

use arrayvec::ArrayVec;
use strum::{EnumCount, IntoEnumIterator};

use super::battle::BattleStats;
use super::bonus::BonusStack;
use super::category::{StatCategory, StatId};
use super::core::{BaseStats, StatBonuses};
use crate::effect::EffectRegistry;
use crate::status::StatusChangeStore;
use crate::types::ResourcePool;

/// Statistics whose value changed during one recompute, in ordinal order.
pub type StatChanges = ArrayVec<(StatId, i32), { StatId::COUNT }>;

/// Read-only inputs of a recompute.
#[derive(Clone, Copy, Debug)]
pub struct StatInputs<'a> {
    pub base: &'a BaseStats,
    pub equipment: &'a StatBonuses,
    pub status: &'a StatusChangeStore,
}

/// Stateless recompute driver bound to a registry.
#[derive(Clone, Copy, Debug)]
pub struct AttributeCalculator<'a> {
    registry: &'a EffectRegistry,
}

impl<'a> AttributeCalculator<'a> {
    pub fn new(registry: &'a EffectRegistry) -> Self {
        Self { registry }
    }

    /// Recomputes `changed` and everything downstream of a moved value.
    ///
    /// Never fails. Requesting an empty set is a no-op, and repeating a
    /// request with unchanged inputs reports no changes.
    pub fn recompute(
        &self,
        inputs: StatInputs<'_>,
        battle: &mut BattleStats,
        pool: &mut ResourcePool,
        changed: StatCategory,
    ) -> StatChanges {
        let mut pending = changed;
        let mut changes = StatChanges::new();
        if pending.is_empty() {
            return changes;
        }

        let mut stack = BonusStack::new();
        for stat in StatId::iter() {
            if !pending.contains(stat.category()) {
                continue;
            }

            let baseline = battle.baseline(stat, inputs.base);
            stack.clear();
            stack.extend(inputs.equipment.for_stat(stat));
            self.fold_effects(&mut stack, stat, inputs.status, battle);

            let bounds = stat.bounds();
            let value = stack.apply(baseline, bounds.min, bounds.max);
            if value == battle.get(stat) {
                continue;
            }

            battle.set(stat, value);
            changes.push((stat, value));
            pending |= stat.dependents();

            match stat {
                StatId::HpMax => pool.hp.set_maximum(value.max(0) as u32),
                StatId::MpMax => pool.mp.set_maximum(value.max(0) as u32),
                _ => {}
            }
        }

        changes
    }

    /// Convenience for a full recompute of every statistic.
    pub fn recompute_all(
        &self,
        inputs: StatInputs<'_>,
        battle: &mut BattleStats,
        pool: &mut ResourcePool,
    ) -> StatChanges {
        self.recompute(inputs, battle, pool, StatCategory::everything())
    }

    /// Pushes every active contribution to `stat`, visiting effects in
    /// effect-type order.
    fn fold_effects(
        &self,
        stack: &mut BonusStack,
        stat: StatId,
        status: &StatusChangeStore,
        battle: &BattleStats,
    ) {
        for instance in status.iter() {
            let meta = self.registry.get(instance.kind);
            for contribution in meta.contributions.iter().filter(|c| c.stat == stat) {
                stack.add(contribution.bonus(&instance.params, battle));
            }
        }
    }
}
