//! Cooperative timer queue.
//!
//! Cancelling drops the id from the live set and leaves the heap entry to be
//! skipped when it surfaces. Once stale entries outnumber live ones the heap
//! is rebuilt, so it stays within twice the live count.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::effect::EffectKind;
use crate::types::{EntityId, Tick};

/// Slot a timer belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerTarget {
    pub entity: EntityId,
    pub kind: EffectKind,
}

/// Stale entries tolerated before a rebuild is worth it.
const COMPACT_SLACK: usize = 16;

#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<(Tick, u64)>>,
    live: HashMap<u64, TimerTarget>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a timer and returns its id. Ids are never reused, and timers due
    /// at the same tick fire in arming order.
    pub fn arm(&mut self, due: Tick, target: TimerTarget) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Reverse((due, id)));
        self.live.insert(id, target);
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: u64) -> bool {
        if self.live.remove(&id).is_none() {
            return false;
        }
        if self.heap.len() > 2 * self.live.len() + COMPACT_SLACK {
            let live = &self.live;
            self.heap.retain(|Reverse((_, id))| live.contains_key(id));
        }
        true
    }

    /// Pops the earliest live timer due at or before `now`.
    pub fn pop_due(&mut self, now: Tick) -> Option<(u64, Tick, TimerTarget)> {
        while let Some(Reverse((due, id))) = self.heap.peek().copied() {
            if due > now {
                return None;
            }
            self.heap.pop();
            if let Some(target) = self.live.remove(&id) {
                return Some((id, due, target));
            }
        }
        None
    }

    /// Tick of the earliest live timer.
    pub fn next_due(&mut self) -> Option<Tick> {
        while let Some(Reverse((due, id))) = self.heap.peek().copied() {
            if self.live.contains_key(&id) {
                return Some(due);
            }
            self.heap.pop();
        }
        None
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(kind: EffectKind) -> TimerTarget {
        TimerTarget {
            entity: EntityId(1),
            kind,
        }
    }

    #[test]
    fn fires_in_due_then_arming_order() {
        let mut q = TimerQueue::new();
        let late = q.arm(Tick(20), target(EffectKind::Stun));
        let first = q.arm(Tick(10), target(EffectKind::Poison));
        let second = q.arm(Tick(10), target(EffectKind::Blind));

        assert_eq!(q.pop_due(Tick(30)).map(|t| t.0), Some(first));
        assert_eq!(q.pop_due(Tick(30)).map(|t| t.0), Some(second));
        assert_eq!(q.pop_due(Tick(30)).map(|t| t.0), Some(late));
        assert!(q.pop_due(Tick(30)).is_none());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut q = TimerQueue::new();
        let id = q.arm(Tick(5), target(EffectKind::Stun));
        let kept = q.arm(Tick(8), target(EffectKind::Poison));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));

        assert_eq!(q.next_due(), Some(Tick(8)));
        assert_eq!(q.pop_due(Tick(10)).map(|t| t.0), Some(kept));
        assert!(q.is_empty());
    }

    #[test]
    fn rearming_one_slot_keeps_heap_bounded() {
        let mut q = TimerQueue::new();
        let other = q.arm(Tick(1_000), target(EffectKind::Poison));
        let mut id = q.arm(Tick(10), target(EffectKind::Stun));
        for step in 0..10_000u64 {
            assert!(q.cancel(id));
            id = q.arm(Tick(10 + step), target(EffectKind::Stun));
        }

        assert_eq!(q.len(), 2);
        assert!(q.heap.len() <= 2 * q.len() + COMPACT_SLACK + 1);
        assert_eq!(q.next_due(), Some(Tick(1_000)));
        assert_eq!(q.pop_due(Tick(1_000)).map(|t| t.0), Some(other));
        assert_eq!(q.next_due(), Some(Tick(10_009)));
        assert_eq!(q.pop_due(Tick(20_000)).map(|t| t.0), Some(id));
        assert!(q.is_empty());
    }

    #[test]
    fn not_due_yet() {
        let mut q = TimerQueue::new();
        q.arm(Tick(50), target(EffectKind::Stun));
        assert!(q.pop_due(Tick(49)).is_none());
        assert_eq!(q.len(), 1);
    }
}
