use crate::stats::{BaseStats, BattleStats, StatBonuses, StatId};
use crate::status::StatusChangeStore;
use crate::types::{EntityId, ResourcePool};

/// Broad class of a hosted entity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityKind {
    #[default]
    Player,
    Npc,
    Summon,
}

/// One simulated entity: stored inputs, computed statistics, pools and
/// active effects.
///
/// `battle` is a pure function of `base`, `equipment` and `status`; only the
/// engine's recompute writes it.
#[derive(Clone, Debug)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) base: BaseStats,
    pub(crate) equipment: StatBonuses,
    pub(crate) battle: BattleStats,
    pub(crate) pool: ResourcePool,
    pub(crate) status: StatusChangeStore,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, base: BaseStats) -> Self {
        Self {
            id,
            kind,
            base,
            equipment: StatBonuses::new(),
            battle: BattleStats::zeroed(),
            pool: ResourcePool::default(),
            status: StatusChangeStore::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    pub fn equipment(&self) -> &StatBonuses {
        &self.equipment
    }

    pub fn battle(&self) -> &BattleStats {
        &self.battle
    }

    pub fn stat(&self, stat: StatId) -> i32 {
        self.battle.get(stat)
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn status(&self) -> &StatusChangeStore {
        &self.status
    }

    pub fn level(&self) -> i32 {
        self.base.level
    }
}
