use status_core::{EffectChange, EntityId, StatId, StatusObserver, Tick};

use crate::events::{EventBus, StatusEvent};

enum Pending {
    Stat(EntityId, StatId, i32),
    Effect(EntityId, EffectChange),
}

/// Collects engine notifications until the current command settles.
///
/// The engine does not know about the bus or the wall clock; the worker
/// drains the buffer once per command and stamps each event with the engine
/// clock at that point.
#[derive(Default)]
pub(crate) struct BufferedObserver {
    pending: Vec<Pending>,
}

impl BufferedObserver {
    pub(crate) fn drain_into(&mut self, bus: &EventBus, at: Tick) -> usize {
        let drained = self.pending.len();
        for pending in self.pending.drain(..) {
            let event = match pending {
                Pending::Stat(entity, stat, value) => StatusEvent::StatChanged {
                    entity,
                    stat,
                    value,
                    at,
                },
                Pending::Effect(entity, change) => StatusEvent::EffectChanged { entity, change, at },
            };
            bus.publish(event);
        }
        drained
    }
}

impl StatusObserver for BufferedObserver {
    fn on_stat_changed(&mut self, entity: EntityId, stat: StatId, value: i32) {
        self.pending.push(Pending::Stat(entity, stat, value));
    }

    fn on_effect_changed(&mut self, entity: EntityId, change: &EffectChange) {
        self.pending.push(Pending::Effect(entity, *change));
    }
}
