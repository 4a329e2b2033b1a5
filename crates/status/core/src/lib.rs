//! Status-effect and derived-attribute engine.
//!
//! `status-core` hosts simulated entities, keeps their concurrently active
//! effects, and recomputes their combat statistics from base attributes,
//! equipment bonuses and effect contributions. It performs no I/O; damage,
//! death, immunity and notifications go through the collaborator traits in
//! [`env`]. All mutation flows through [`engine::StatusEngine`].
pub mod config;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod stats;
pub mod status;
pub mod types;

pub use config::{EngineConfig, LogoutPolicy};
pub use effect::{
    Capabilities, Capability, EffectFlags, EffectInstance, EffectKind, EffectMetadata,
    EffectRegistry, ExitReason,
};
pub use engine::{
    ApplyFlags, ApplyOutcome, ApplyRequest, ClearReason, Entity, EntityKind, SavedEffect,
    StatusEngine,
};
pub use env::{
    AppliedDelta, CombatHost, EffectChange, NullObserver, RecordingObserver, StandardHost,
    StatusObserver,
};
pub use error::{EngineError, ErrorSeverity, RegistryError, StatusError};
pub use stats::{BaseStats, BattleStats, Bonus, StatBonuses, StatCategory, StatId};
pub use status::StatusChangeStore;
pub use types::{EntityId, ResourceMeter, ResourcePool, Tick};
