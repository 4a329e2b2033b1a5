//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the engine.

use std::sync::Arc;
use std::time::Duration;

use status_core::env::RngOracle;
use status_core::{EffectRegistry, EngineConfig, StatusEngine};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, StatusEvent, Topic};
use crate::hooks::{HookRegistry, HookedHost};
use crate::workers::{BufferedObserver, SimulationWorker};

/// Wall-clock pacing of the simulated clock.
///
/// Every `period` the worker advances the engine by `ticks_per_period`.
#[derive(Debug, Clone, Copy)]
pub struct ClockConfig {
    pub period: Duration,
    pub ticks_per_period: u64,
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Automatic clock; `None` leaves time to [`RuntimeHandle::advance`].
    pub clock: Option<ClockConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            clock: None,
        }
    }
}

/// Main runtime that hosts the status engine
///
/// Runtime owns the worker; [`RuntimeHandle`] provides a cloneable façade
/// for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events of one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<StatusEvent> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    registry: Option<Arc<EffectRegistry>>,
    hooks: Option<HookRegistry>,
    rng: Option<Box<dyn RngOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            registry: None,
            hooks: None,
            rng: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the engine configuration
    pub fn engine_config(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    /// Effect table to run with. Defaults to [`EffectRegistry::builtin`].
    pub fn registry(mut self, registry: Arc<EffectRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set start filters consulted before any effect starts.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Replace the roll oracle (tests pin outcomes with a fixed roll).
    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Enable the automatic clock
    pub fn clock(mut self, clock: ClockConfig) -> Self {
        self.config.clock = Some(clock);
        self
    }

    /// Build and start the runtime
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(EffectRegistry::builtin()));
        let host = HookedHost::new(self.hooks.unwrap_or_default());

        let mut engine =
            StatusEngine::with_parts(registry, config.engine, host, BufferedObserver::default());
        if let Some(rng) = self.rng {
            engine = engine.with_rng(rng);
        }

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let worker = SimulationWorker::new(engine, command_rx, event_bus.clone(), config.clock);
        let sim_worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            sim_worker_handle,
        })
    }
}
