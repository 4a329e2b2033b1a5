//! The status engine.
//!
//! [`StatusEngine`] owns every hosted entity and is the only code that mutates
//! a [`StatusChangeStore`](crate::status::StatusChangeStore). All operations run
//! to completion on the caller's thread. Operations may nest (an ending effect
//! can start or end others); nesting is bounded by
//! [`EngineConfig::max_reentry_depth`], and statistic recomputation is deferred
//! until the outermost operation returns so that observers only ever see
//! settled values.
mod entity;
mod lifecycle;
mod request;
pub mod resist;
mod tick;
pub mod timer;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use entity::{Entity, EntityKind};
pub use request::{ApplyFlags, ApplyOutcome, ApplyRequest, ClearReason, SavedEffect};

use crate::config::EngineConfig;
use crate::effect::{Capability, EffectInstance, EffectKind, EffectRegistry};
use crate::env::{CombatHost, EffectChange, NullObserver, PcgRng, RngOracle, StandardHost, StatusObserver};
use crate::error::EngineError;
use crate::stats::{AttributeCalculator, BaseStats, StatBonuses, StatCategory, StatInputs};
use crate::types::{EntityId, Tick};
use timer::TimerQueue;

pub struct StatusEngine<H: CombatHost = StandardHost, O: StatusObserver = NullObserver> {
    registry: Arc<EffectRegistry>,
    config: EngineConfig,
    rng: Box<dyn RngOracle>,
    entities: BTreeMap<EntityId, Entity>,
    timers: TimerQueue,
    now: Tick,
    nonce: u64,
    depth: u32,
    dirty: BTreeMap<EntityId, StatCategory>,
    host: H,
    observer: O,
}

impl StatusEngine {
    /// Engine with the standard host and no observer.
    pub fn new(registry: Arc<EffectRegistry>, config: EngineConfig) -> Self {
        Self::with_parts(registry, config, StandardHost::new(), NullObserver)
    }
}

impl<H: CombatHost, O: StatusObserver> StatusEngine<H, O> {
    pub fn with_parts(
        registry: Arc<EffectRegistry>,
        config: EngineConfig,
        host: H,
        observer: O,
    ) -> Self {
        Self {
            registry,
            config,
            rng: Box::new(PcgRng),
            entities: BTreeMap::new(),
            timers: TimerQueue::new(),
            now: Tick::ZERO,
            nonce: 0,
            depth: 0,
            dirty: BTreeMap::new(),
            host,
            observer,
        }
    }

    /// Replaces the roll oracle.
    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn registry(&self) -> &Arc<EffectRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Tick of the next pending timer, if any.
    pub fn next_timer(&mut self) -> Option<Tick> {
        self.timers.next_due()
    }

    // ===== entities =====

    /// Registers an entity, computes its statistics and fills its pools.
    ///
    /// The initial computation is not reported to the observer.
    pub fn spawn(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        base: BaseStats,
    ) -> Result<(), EngineError> {
        if self.entities.contains_key(&id) {
            return Err(EngineError::DuplicateEntity(id));
        }

        let mut entity = Entity::new(id, kind, base);
        let inputs = StatInputs {
            base: &entity.base,
            equipment: &entity.equipment,
            status: &entity.status,
        };
        AttributeCalculator::new(&self.registry).recompute_all(
            inputs,
            &mut entity.battle,
            &mut entity.pool,
        );
        entity.pool.hp.current = entity.pool.hp.maximum;
        entity.pool.mp.current = entity.pool.mp.maximum;

        tracing::debug!(entity = %id, ?kind, "entity spawned");
        self.entities.insert(id, entity);
        Ok(())
    }

    /// Removes an entity without running end triggers.
    pub fn despawn(&mut self, id: EntityId) -> Result<Entity, EngineError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(EngineError::UnknownEntity(id))?;
        for instance in entity.status.iter() {
            if let Some(timer) = instance.timer {
                self.timers.cancel(timer.id);
            }
        }
        self.dirty.remove(&id);
        tracing::debug!(entity = %id, "entity despawned");
        Ok(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    // ===== queries =====

    pub fn has_effect(&self, id: EntityId, kind: EffectKind) -> bool {
        self.effect(id, kind).is_some()
    }

    pub fn effect(&self, id: EntityId, kind: EffectKind) -> Option<&EffectInstance> {
        self.entities.get(&id)?.status.get(kind)
    }

    /// Parameter `index` of an active effect; `None` if absent or out of range.
    pub fn param(&self, id: EntityId, kind: EffectKind, index: usize) -> Option<i32> {
        self.effect(id, kind)?.param(index)
    }

    /// Remaining duration of an active effect as of now.
    ///
    /// `Some(None)` is an active effect that never expires.
    pub fn remaining(&self, id: EntityId, kind: EffectKind) -> Option<Option<u64>> {
        self.effect(id, kind).map(|inst| inst.remaining_at(self.now))
    }

    /// Whether `id` may currently perform `capability`. Unknown entities may
    /// do nothing.
    pub fn capability(&self, id: EntityId, capability: Capability) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|entity| !entity.status.is_blocked(capability))
    }

    // ===== externally owned inputs =====

    /// Recomputes every statistic of `id`.
    pub fn recompute_all(&mut self, id: EntityId) -> Result<(), EngineError> {
        self.touch(id, StatCategory::everything())
    }

    pub fn set_base_stats(&mut self, id: EntityId, base: BaseStats) -> Result<(), EngineError> {
        self.entity_mut(id)?.base = base;
        self.touch(id, StatCategory::everything())
    }

    pub fn set_level(&mut self, id: EntityId, level: i32) -> Result<(), EngineError> {
        self.entity_mut(id)?.base.level = level;
        self.touch(id, StatCategory::everything())
    }

    pub fn set_equipment_bonuses(
        &mut self,
        id: EntityId,
        bonuses: StatBonuses,
    ) -> Result<(), EngineError> {
        self.entity_mut(id)?.equipment = bonuses;
        self.touch(id, StatCategory::everything())
    }

    /// Fills both pools to their current maximum.
    pub fn refill(&mut self, id: EntityId) -> Result<(), EngineError> {
        let entity = self.entity_mut(id)?;
        entity.pool.hp.current = entity.pool.hp.maximum;
        entity.pool.mp.current = entity.pool.mp.maximum;
        Ok(())
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EngineError> {
        self.entities
            .get_mut(&id)
            .ok_or(EngineError::UnknownEntity(id))
    }

    /// Marks categories dirty and flushes unless an operation is in flight.
    fn touch(&mut self, id: EntityId, categories: StatCategory) -> Result<(), EngineError> {
        if !self.entities.contains_key(&id) {
            return Err(EngineError::UnknownEntity(id));
        }
        self.mark_dirty(id, categories);
        if self.depth == 0 {
            self.flush();
        }
        Ok(())
    }

    // ===== nesting and deferred recompute =====

    /// Enters one level of nesting; false when the depth guard trips.
    fn enter(&mut self) -> bool {
        if self.depth >= self.config.max_reentry_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leaves one level of nesting and flushes at the outermost level.
    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.flush();
        }
    }

    fn mark_dirty(&mut self, id: EntityId, categories: StatCategory) {
        if categories.is_empty() {
            return;
        }
        *self.dirty.entry(id).or_default() |= categories;
    }

    /// Recomputes every dirty entity and reports changed values.
    fn flush(&mut self) {
        let calculator = AttributeCalculator::new(&self.registry);
        for (id, categories) in std::mem::take(&mut self.dirty) {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            let inputs = StatInputs {
                base: &entity.base,
                equipment: &entity.equipment,
                status: &entity.status,
            };
            let changes =
                calculator.recompute(inputs, &mut entity.battle, &mut entity.pool, categories);
            for (stat, value) in changes {
                tracing::trace!(entity = %id, %stat, value, "stat changed");
                self.observer.on_stat_changed(id, stat, value);
            }
        }
    }

    fn notify_effect(&mut self, id: EntityId, kind: EffectKind, change: EffectChange) {
        if self
            .registry
            .get(kind)
            .flags
            .contains(crate::effect::EffectFlags::NO_ICON)
        {
            return;
        }
        self.observer.on_effect_changed(id, &change);
    }
}
