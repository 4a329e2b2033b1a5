//! Read-only copies of engine state handed across the worker boundary.

use serde::{Deserialize, Serialize};
use status_core::{
    BaseStats, BattleStats, Capabilities, Capability, Entity, EntityId, EntityKind, ResourcePool,
    SavedEffect, Tick,
};

/// Everything observable about one entity at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub base: BaseStats,
    pub battle: BattleStats,
    pub pool: ResourcePool,
    /// Active effects in effect-type order, with remaining time as of `taken_at`.
    pub effects: Vec<SavedEffect>,
    /// Capabilities currently forbidden.
    pub blocked: Capabilities,
    pub taken_at: Tick,
}

impl EntitySnapshot {
    pub(crate) fn capture(entity: &Entity, now: Tick) -> Self {
        let status = entity.status();
        let effects = status
            .iter()
            .map(|instance| SavedEffect {
                kind: instance.kind,
                params: instance.params,
                remaining: instance.remaining_at(now),
            })
            .collect();
        let blocked = Capabilities::all()
            .capabilities()
            .filter(|cap| status.is_blocked(*cap))
            .fold(Capabilities::empty(), |acc, cap| acc | cap.flag());

        Self {
            id: entity.id(),
            kind: entity.kind(),
            base: *entity.base(),
            battle: *entity.battle(),
            pool: *entity.pool(),
            effects,
            blocked,
            taken_at: now,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        !self.blocked.contains(capability.flag())
    }
}
