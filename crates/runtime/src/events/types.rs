//! Event payloads.

use serde::{Deserialize, Serialize};
use status_core::{EffectChange, EntityId, StatId, Tick};

use super::bus::Topic;

/// Something observable happened inside the engine.
///
/// Every event carries the engine clock at the moment the causing command
/// settled, so consumers can order events from different topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEvent {
    /// A computed statistic settled on a new value.
    StatChanged {
        entity: EntityId,
        stat: StatId,
        value: i32,
        at: Tick,
    },

    /// An effect started, was refreshed or stacked, or ended.
    EffectChanged {
        entity: EntityId,
        change: EffectChange,
        at: Tick,
    },

    /// The engine clock moved forward.
    Tick { now: Tick, fired: usize },
}

impl StatusEvent {
    pub fn topic(&self) -> Topic {
        match self {
            StatusEvent::StatChanged { .. } => Topic::Stats,
            StatusEvent::EffectChanged { .. } => Topic::Effects,
            StatusEvent::Tick { .. } => Topic::Clock,
        }
    }

    /// Entity the event concerns; `None` for clock events.
    pub fn entity(&self) -> Option<EntityId> {
        match *self {
            StatusEvent::StatChanged { entity, .. } | StatusEvent::EffectChanged { entity, .. } => {
                Some(entity)
            }
            StatusEvent::Tick { .. } => None,
        }
    }
}
