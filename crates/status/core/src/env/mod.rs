//! Collaborators the engine consumes.
//!
//! The engine never touches I/O or game rules outside the status domain. It
//! asks a [`CombatHost`] to move resources and to answer death, immunity and
//! start-filter questions, and it reports every visible change to a
//! [`StatusObserver`]. Randomness comes from an [`RngOracle`].
mod rng;

use std::collections::BTreeSet;

pub use rng::{FixedRng, PcgRng, RngOracle, compute_seed};

use crate::effect::{EffectKind, ExitReason};
use crate::engine::ApplyRequest;
use crate::stats::StatId;
use crate::types::{EntityId, ResourcePool};

/// Result of a resource change as actually applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppliedDelta {
    pub hp: i32,
    pub sp: i32,
    /// The change brought the entity to zero HP.
    pub killed: bool,
}

/// Damage, death and admission rules owned by the surrounding game.
///
/// Every method has a default matching plain meter arithmetic, so a host only
/// overrides what it cares about.
pub trait CombatHost {
    /// Apply an HP/SP change to `pool`, returning what was actually applied.
    fn apply_delta(
        &mut self,
        target: EntityId,
        pool: &mut ResourcePool,
        hp: i32,
        sp: i32,
    ) -> AppliedDelta {
        let _ = target;
        let was_alive = !pool.hp.is_empty();
        let hp = pool.hp.apply(hp);
        let sp = pool.mp.apply(sp);
        AppliedDelta {
            hp,
            sp,
            killed: was_alive && pool.hp.is_empty(),
        }
    }

    fn is_dead(&self, target: EntityId, pool: &ResourcePool) -> bool {
        let _ = target;
        pool.hp.is_empty()
    }

    /// Entity-level immunity (bosses, cards, racial traits).
    fn is_immune(&self, target: EntityId, kind: EffectKind) -> bool {
        let _ = (target, kind);
        false
    }

    /// Last chance to veto a start after every engine check has passed.
    fn admit(&mut self, target: EntityId, request: &ApplyRequest) -> bool {
        let _ = (target, request);
        true
    }
}

/// Default host: meter arithmetic plus an explicit immunity list.
#[derive(Clone, Debug, Default)]
pub struct StandardHost {
    immunities: BTreeSet<(EntityId, EffectKind)>,
}

impl StandardHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant_immunity(&mut self, entity: EntityId, kind: EffectKind) {
        self.immunities.insert((entity, kind));
    }

    pub fn revoke_immunity(&mut self, entity: EntityId, kind: EffectKind) {
        self.immunities.remove(&(entity, kind));
    }
}

impl CombatHost for StandardHost {
    fn is_immune(&self, target: EntityId, kind: EffectKind) -> bool {
        self.immunities.contains(&(target, kind))
    }
}

/// An effect slot became active, was refreshed, or ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectChange {
    pub kind: EffectKind,
    pub active: bool,
    pub remaining: Option<u64>,
    pub params: [i32; 4],
    /// Set when `active` is false.
    pub reason: Option<ExitReason>,
}

/// Receiver of outward-facing notifications.
///
/// Stat notifications are only sent for values that actually changed.
pub trait StatusObserver {
    fn on_stat_changed(&mut self, entity: EntityId, stat: StatId, value: i32) {
        let _ = (entity, stat, value);
    }

    fn on_effect_changed(&mut self, entity: EntityId, change: &EffectChange) {
        let _ = (entity, change);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl StatusObserver for NullObserver {}

/// Something a [`RecordingObserver`] saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observed {
    Stat {
        entity: EntityId,
        stat: StatId,
        value: i32,
    },
    Effect {
        entity: EntityId,
        change: EffectChange,
    },
}

/// Observer that keeps every notification in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<Observed>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn stat_changes(&self, entity: EntityId) -> Vec<(StatId, i32)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                Observed::Stat {
                    entity: e,
                    stat,
                    value,
                } if e == entity => Some((stat, value)),
                _ => None,
            })
            .collect()
    }

    pub fn effect_changes(&self, entity: EntityId) -> Vec<EffectChange> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                Observed::Effect { entity: e, change } if e == entity => Some(change),
                _ => None,
            })
            .collect()
    }
}

impl StatusObserver for RecordingObserver {
    fn on_stat_changed(&mut self, entity: EntityId, stat: StatId, value: i32) {
        self.events.push(Observed::Stat {
            entity,
            stat,
            value,
        });
    }

    fn on_effect_changed(&mut self, entity: EntityId, change: &EffectChange) {
        self.events.push(Observed::Effect {
            entity,
            change: *change,
        });
    }
}
