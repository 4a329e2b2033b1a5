//! Runtime orchestration for the status engine.
//!
//! This crate runs a [`status_core::StatusEngine`] inside a single tokio task
//! and exposes it through a cloneable [`RuntimeHandle`]. Every engine call is
//! serialized through the worker's command channel, so the engine itself stays
//! single-threaded. Observer notifications are stamped with the engine clock
//! and published on a topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`hooks`] provides prioritized start filters consulted before an effect starts
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod hooks;
pub mod runtime;

mod workers;

pub use api::{EntitySnapshot, Result, RuntimeError, RuntimeHandle};
pub use events::{EventBus, StatusEvent, Topic};
pub use hooks::{BlockKinds, HookRegistry, HookedHost, StartFilter};
pub use runtime::{ClockConfig, Runtime, RuntimeBuilder, RuntimeConfig};
