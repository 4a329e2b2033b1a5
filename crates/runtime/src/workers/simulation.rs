//! Simulation worker that owns the authoritative [`StatusEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! against the engine one at a time, and publishes the resulting events to
//! the [`EventBus`].

use std::time::Duration;

use status_content::EntityTemplate;
use status_core::{
    AppliedDelta, ApplyOutcome, ApplyRequest, BaseStats, Capability, ClearReason, EffectKind,
    EngineError, EntityId, EntityKind, SavedEffect, StatBonuses, StatusEngine, Tick,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::BufferedObserver;
use crate::api::EntitySnapshot;
use crate::events::{EventBus, StatusEvent};
use crate::hooks::HookedHost;
use crate::runtime::ClockConfig;

type Engine = StatusEngine<HookedHost, BufferedObserver>;

type Reply<T> = oneshot::Sender<T>;

/// Commands that can be sent to the simulation worker
pub(crate) enum Command {
    Spawn {
        id: EntityId,
        kind: EntityKind,
        base: BaseStats,
        reply: Reply<Result<(), EngineError>>,
    },
    SpawnTemplate {
        id: EntityId,
        template: Box<EntityTemplate>,
        reply: Reply<Result<(), EngineError>>,
    },
    Despawn {
        id: EntityId,
        reply: Reply<Result<(), EngineError>>,
    },
    Apply {
        target: EntityId,
        request: ApplyRequest,
        reply: Reply<ApplyOutcome>,
    },
    ForceExit {
        target: EntityId,
        kind: EffectKind,
        reply: Reply<bool>,
    },
    Clear {
        target: EntityId,
        reason: ClearReason,
        reply: Reply<usize>,
    },
    Damage {
        target: EntityId,
        hp: i32,
        sp: i32,
        reply: Reply<Option<AppliedDelta>>,
    },
    SetLevel {
        target: EntityId,
        level: i32,
        reply: Reply<Result<(), EngineError>>,
    },
    SetBaseStats {
        target: EntityId,
        base: BaseStats,
        reply: Reply<Result<(), EngineError>>,
    },
    SetEquipment {
        target: EntityId,
        bonuses: StatBonuses,
        reply: Reply<Result<(), EngineError>>,
    },
    GrantImmunity {
        target: EntityId,
        kind: EffectKind,
        reply: Reply<()>,
    },
    Advance {
        ticks: u64,
        reply: Reply<usize>,
    },
    HasEffect {
        target: EntityId,
        kind: EffectKind,
        reply: Reply<bool>,
    },
    Param {
        target: EntityId,
        kind: EffectKind,
        index: usize,
        reply: Reply<Option<i32>>,
    },
    Capability {
        target: EntityId,
        capability: Capability,
        reply: Reply<bool>,
    },
    SavedEffects {
        target: EntityId,
        reply: Reply<Vec<SavedEffect>>,
    },
    Restore {
        target: EntityId,
        effects: Vec<SavedEffect>,
        reply: Reply<usize>,
    },
    Snapshot {
        target: EntityId,
        reply: Reply<Option<EntitySnapshot>>,
    },
    Now {
        reply: Reply<Tick>,
    },
}

/// Background task that processes engine commands.
pub(crate) struct SimulationWorker {
    engine: Engine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    clock: Option<ClockConfig>,
}

impl SimulationWorker {
    pub(crate) fn new(
        engine: Engine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        clock: Option<ClockConfig>,
    ) -> Self {
        info!(
            effects = engine.registry().len(),
            seed = engine.config().game_seed,
            clock = ?clock,
            "SimulationWorker initialized"
        );

        Self {
            engine,
            command_rx,
            event_bus,
            clock,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub(crate) async fn run(mut self) {
        // a disabled clock still needs a timer to select on
        let period = self
            .clock
            .map_or(Duration::from_secs(3600), |clock| clock.period);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    // every handle dropped
                    let Some(cmd) = cmd else { break };
                    self.handle_command(cmd);
                }
                _ = interval.tick(), if self.clock.is_some() => {
                    if let Some(clock) = self.clock {
                        self.advance(clock.ticks_per_period);
                    }
                }
            }
        }

        info!(now = self.engine.now().0, "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Spawn {
                id,
                kind,
                base,
                reply,
            } => {
                let result = self.engine.spawn(id, kind, base);
                self.respond(reply, result, "Spawn");
            }
            Command::SpawnTemplate {
                id,
                template,
                reply,
            } => {
                let result = template.spawn_into(&mut self.engine, id);
                self.respond(reply, result, "SpawnTemplate");
            }
            Command::Despawn { id, reply } => {
                let result = self.engine.despawn(id).map(|_| ());
                self.respond(reply, result, "Despawn");
            }
            Command::Apply {
                target,
                request,
                reply,
            } => {
                let outcome = self.engine.apply(target, request);
                self.respond(reply, outcome, "Apply");
            }
            Command::ForceExit {
                target,
                kind,
                reply,
            } => {
                let ended = self.engine.force_exit(target, kind);
                self.respond(reply, ended, "ForceExit");
            }
            Command::Clear {
                target,
                reason,
                reply,
            } => {
                let ended = self.engine.clear(target, reason);
                self.respond(reply, ended, "Clear");
            }
            Command::Damage {
                target,
                hp,
                sp,
                reply,
            } => {
                let applied = self.engine.apply_delta(target, hp, sp);
                self.respond(reply, applied, "Damage");
            }
            Command::SetLevel {
                target,
                level,
                reply,
            } => {
                let result = self.engine.set_level(target, level);
                self.respond(reply, result, "SetLevel");
            }
            Command::SetBaseStats {
                target,
                base,
                reply,
            } => {
                let result = self.engine.set_base_stats(target, base);
                self.respond(reply, result, "SetBaseStats");
            }
            Command::SetEquipment {
                target,
                bonuses,
                reply,
            } => {
                let result = self.engine.set_equipment_bonuses(target, bonuses);
                self.respond(reply, result, "SetEquipment");
            }
            Command::GrantImmunity {
                target,
                kind,
                reply,
            } => {
                self.engine
                    .host_mut()
                    .standard
                    .grant_immunity(target, kind);
                self.respond(reply, (), "GrantImmunity");
            }
            Command::Advance { ticks, reply } => {
                let fired = self.advance(ticks);
                self.respond(reply, fired, "Advance");
            }
            Command::HasEffect {
                target,
                kind,
                reply,
            } => {
                let present = self.engine.has_effect(target, kind);
                self.respond(reply, present, "HasEffect");
            }
            Command::Param {
                target,
                kind,
                index,
                reply,
            } => {
                let value = self.engine.param(target, kind, index);
                self.respond(reply, value, "Param");
            }
            Command::Capability {
                target,
                capability,
                reply,
            } => {
                let allowed = self.engine.capability(target, capability);
                self.respond(reply, allowed, "Capability");
            }
            Command::SavedEffects { target, reply } => {
                let saved = self.engine.saved_effects(target);
                self.respond(reply, saved, "SavedEffects");
            }
            Command::Restore {
                target,
                effects,
                reply,
            } => {
                let restored = self.engine.restore(target, &effects);
                self.respond(reply, restored, "Restore");
            }
            Command::Snapshot { target, reply } => {
                let now = self.engine.now();
                let snapshot = self
                    .engine
                    .entity(target)
                    .map(|entity| EntitySnapshot::capture(entity, now));
                self.respond(reply, snapshot, "Snapshot");
            }
            Command::Now { reply } => {
                let now = self.engine.now();
                self.respond(reply, now, "Now");
            }
        }
    }

    /// Publishes what the command caused, then answers the caller.
    fn respond<T>(&mut self, reply: Reply<T>, value: T, command: &'static str) {
        self.publish_pending();
        if reply.send(value).is_err() {
            debug!("{} reply channel closed (caller dropped)", command);
        }
    }

    /// Advances timer by timer so each event carries the tick it happened at.
    fn advance(&mut self, ticks: u64) -> usize {
        let until = self.engine.now() + ticks;
        let mut fired = 0;
        while let Some(due) = self.engine.next_timer().filter(|due| *due <= until) {
            fired += self.engine.advance_to(due);
            self.publish_pending();
        }
        self.engine.advance_to(until);

        self.event_bus.publish(StatusEvent::Tick {
            now: self.engine.now(),
            fired,
        });
        fired
    }

    fn publish_pending(&mut self) {
        let now = self.engine.now();
        let published = self
            .engine
            .observer_mut()
            .drain_into(&self.event_bus, now);
        if published > 0 {
            tracing::trace!(published, now = now.0, "events published");
        }
    }
}
