//! Per-entity effect slots and capability reference counts.

use strum::EnumCount;

use crate::effect::{
    Capabilities, Capability, EffectInstance, EffectKind, EffectRegistry, LockCondition,
};

/// Every active effect of one entity.
///
/// Slots form an arena indexed by [`EffectKind`], so each type has at most one
/// instance. Capability locks are reference counts maintained on insert and
/// take; conditional locks are re-derived from the whole slot set after every
/// change instead of being counted.
///
/// Only the engine mutates a store.
#[derive(Clone, Debug)]
pub struct StatusChangeStore {
    slots: [Option<EffectInstance>; EffectKind::COUNT],
    count: usize,
    locks: [u16; Capability::COUNT],
    conditional: Capabilities,
}

impl StatusChangeStore {
    pub fn new() -> Self {
        Self {
            slots: [None; EffectKind::COUNT],
            count: 0,
            locks: [0; Capability::COUNT],
            conditional: Capabilities::empty(),
        }
    }

    #[inline]
    pub fn get(&self, kind: EffectKind) -> Option<&EffectInstance> {
        self.slots[kind.index()].as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, kind: EffectKind) -> Option<&mut EffectInstance> {
        self.slots[kind.index()].as_mut()
    }

    #[inline]
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Active instances in effect-type order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.slots.iter().flatten()
    }

    /// Kinds of all active instances, in effect-type order.
    pub fn kinds(&self) -> Vec<EffectKind> {
        self.iter().map(|inst| inst.kind).collect()
    }

    pub fn lock_count(&self, capability: Capability) -> u16 {
        self.locks[capability.index()]
    }

    /// Whether `capability` is currently forbidden.
    pub fn is_blocked(&self, capability: Capability) -> bool {
        self.lock_count(capability) > 0 || self.conditional.contains(capability.flag())
    }

    /// Places a new instance into an empty slot and counts its locks.
    pub(crate) fn insert(&mut self, instance: EffectInstance, locks: Capabilities) {
        let slot = &mut self.slots[instance.kind.index()];
        debug_assert!(slot.is_none(), "slot {} already occupied", instance.kind);
        if slot.replace(instance).is_none() {
            self.count += 1;
        }
        for cap in locks.capabilities() {
            self.locks[cap.index()] = self.locks[cap.index()].saturating_add(1);
        }
    }

    /// Empties a slot and releases its locks.
    ///
    /// The slot is vacated before anything else happens, so every later
    /// observer of the store sees the effect as absent.
    pub(crate) fn take(&mut self, kind: EffectKind, locks: Capabilities) -> Option<EffectInstance> {
        let instance = self.slots[kind.index()].take()?;
        self.count -= 1;
        for cap in locks.capabilities() {
            let counter = &mut self.locks[cap.index()];
            debug_assert!(*counter > 0, "{cap} lock counter underflow");
            *counter = counter.saturating_sub(1);
        }
        Some(instance)
    }

    /// Re-derives the conditional locks from the current slot set.
    pub(crate) fn refresh_conditional(&mut self, registry: &EffectRegistry) {
        let mut conditional = Capabilities::empty();
        for instance in self.slots.iter().flatten() {
            for lock in &registry.get(instance.kind).conditional_locks {
                let holds = match lock.condition {
                    LockCondition::Present(other) => self.contains(other),
                    LockCondition::Absent(other) => !self.contains(other),
                };
                if holds {
                    conditional |= lock.locks;
                }
            }
        }
        self.conditional = conditional;
    }
}

impl Default for StatusChangeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tick;

    fn instance(kind: EffectKind) -> EffectInstance {
        EffectInstance::new(kind, None, [0; 4], Some(1000), Tick::ZERO)
    }

    #[test]
    fn counters_follow_insert_and_take() {
        let mut store = StatusChangeStore::new();
        store.insert(instance(EffectKind::Rooted), Capabilities::MOVE);
        store.insert(
            instance(EffectKind::Stun),
            Capabilities::MOVE | Capabilities::CAST,
        );
        assert_eq!(store.count(), 2);
        assert_eq!(store.lock_count(Capability::Move), 2);
        assert!(store.is_blocked(Capability::Cast));

        store.take(EffectKind::Stun, Capabilities::MOVE | Capabilities::CAST);
        assert_eq!(store.count(), 1);
        assert_eq!(store.lock_count(Capability::Move), 1);
        assert!(!store.is_blocked(Capability::Cast));
    }

    #[test]
    fn take_on_empty_slot_changes_nothing() {
        let mut store = StatusChangeStore::new();
        store.insert(instance(EffectKind::Rooted), Capabilities::MOVE);
        assert!(store.take(EffectKind::Stun, Capabilities::MOVE).is_none());
        assert_eq!(store.count(), 1);
        assert_eq!(store.lock_count(Capability::Move), 1);
    }

    #[test]
    fn conditional_locks_track_partner_presence() {
        let registry = EffectRegistry::builtin();
        let mut store = StatusChangeStore::new();

        store.insert(instance(EffectKind::Performing), Capabilities::empty());
        store.refresh_conditional(&registry);
        assert!(store.is_blocked(Capability::Move));
        assert_eq!(store.lock_count(Capability::Move), 0);

        store.insert(instance(EffectKind::Longing), Capabilities::empty());
        store.refresh_conditional(&registry);
        assert!(!store.is_blocked(Capability::Move));
    }

    #[test]
    fn iteration_is_in_kind_order() {
        let mut store = StatusChangeStore::new();
        store.insert(instance(EffectKind::Haste), Capabilities::empty());
        store.insert(instance(EffectKind::Poison), Capabilities::empty());
        assert_eq!(store.kinds(), vec![EffectKind::Poison, EffectKind::Haste]);
    }
}
