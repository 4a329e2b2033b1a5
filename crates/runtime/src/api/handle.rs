//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! every engine operation, plus event subscriptions by topic.
use std::collections::HashMap;

use status_content::EntityTemplate;
use status_core::{
    AppliedDelta, ApplyOutcome, ApplyRequest, BaseStats, Capability, ClearReason, EffectKind,
    EntityId, EntityKind, SavedEffect, StatBonuses, Tick,
};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use super::snapshot::EntitySnapshot;
use crate::events::{EventBus, StatusEvent, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends one command and waits for the worker's reply.
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    // ===== entities =====

    pub async fn spawn_entity(&self, id: EntityId, kind: EntityKind, base: BaseStats) -> Result<()> {
        self.request(|reply| Command::Spawn {
            id,
            kind,
            base,
            reply,
        })
        .await??;
        Ok(())
    }

    /// Spawns a content template, equipment included.
    pub async fn spawn_template(&self, id: EntityId, template: EntityTemplate) -> Result<()> {
        self.request(|reply| Command::SpawnTemplate {
            id,
            template: Box::new(template),
            reply,
        })
        .await??;
        Ok(())
    }

    pub async fn despawn(&self, id: EntityId) -> Result<()> {
        self.request(|reply| Command::Despawn { id, reply }).await??;
        Ok(())
    }

    pub async fn set_level(&self, target: EntityId, level: i32) -> Result<()> {
        self.request(|reply| Command::SetLevel {
            target,
            level,
            reply,
        })
        .await??;
        Ok(())
    }

    pub async fn set_base_stats(&self, target: EntityId, base: BaseStats) -> Result<()> {
        self.request(|reply| Command::SetBaseStats {
            target,
            base,
            reply,
        })
        .await??;
        Ok(())
    }

    pub async fn set_equipment(&self, target: EntityId, bonuses: StatBonuses) -> Result<()> {
        self.request(|reply| Command::SetEquipment {
            target,
            bonuses,
            reply,
        })
        .await??;
        Ok(())
    }

    pub async fn grant_immunity(&self, target: EntityId, kind: EffectKind) -> Result<()> {
        self.request(|reply| Command::GrantImmunity {
            target,
            kind,
            reply,
        })
        .await
    }

    // ===== effects =====

    /// Starts, refreshes or stacks an effect.
    pub async fn apply(&self, target: EntityId, request: ApplyRequest) -> Result<ApplyOutcome> {
        self.request(|reply| Command::Apply {
            target,
            request,
            reply,
        })
        .await
    }

    /// Ends an active effect; `false` if it was absent.
    pub async fn force_exit(&self, target: EntityId, kind: EffectKind) -> Result<bool> {
        self.request(|reply| Command::ForceExit {
            target,
            kind,
            reply,
        })
        .await
    }

    pub async fn clear(&self, target: EntityId, reason: ClearReason) -> Result<usize> {
        self.request(|reply| Command::Clear {
            target,
            reason,
            reply,
        })
        .await
    }

    /// Routes an HP/SP change through the host; negative values are damage.
    ///
    /// `None` when the target is unknown.
    pub async fn damage(&self, target: EntityId, hp: i32, sp: i32) -> Result<Option<AppliedDelta>> {
        self.request(|reply| Command::Damage {
            target,
            hp,
            sp,
            reply,
        })
        .await
    }

    pub async fn saved_effects(&self, target: EntityId) -> Result<Vec<SavedEffect>> {
        self.request(|reply| Command::SavedEffects { target, reply })
            .await
    }

    pub async fn restore(&self, target: EntityId, effects: Vec<SavedEffect>) -> Result<usize> {
        self.request(|reply| Command::Restore {
            target,
            effects,
            reply,
        })
        .await
    }

    // ===== clock =====

    /// Fires every timer due within the next `ticks` and returns how many fired.
    pub async fn advance(&self, ticks: u64) -> Result<usize> {
        self.request(|reply| Command::Advance { ticks, reply })
            .await
    }

    pub async fn now(&self) -> Result<Tick> {
        self.request(|reply| Command::Now { reply }).await
    }

    // ===== queries =====

    pub async fn has_effect(&self, target: EntityId, kind: EffectKind) -> Result<bool> {
        self.request(|reply| Command::HasEffect {
            target,
            kind,
            reply,
        })
        .await
    }

    pub async fn param(&self, target: EntityId, kind: EffectKind, index: usize) -> Result<Option<i32>> {
        self.request(|reply| Command::Param {
            target,
            kind,
            index,
            reply,
        })
        .await
    }

    /// Whether `target` may currently perform `capability`.
    pub async fn capability(&self, target: EntityId, capability: Capability) -> Result<bool> {
        self.request(|reply| Command::Capability {
            target,
            capability,
            reply,
        })
        .await
    }

    pub async fn snapshot(&self, target: EntityId) -> Result<Option<EntitySnapshot>> {
        self.request(|reply| Command::Snapshot { target, reply })
            .await
    }

    // ===== events =====

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Stats` - Computed statistic changes
    /// - `Topic::Effects` - Effect start, refresh and end
    /// - `Topic::Clock` - Clock advancement
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<StatusEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<StatusEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
