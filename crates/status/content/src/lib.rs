//! Data-driven content for the status engine.
//!
//! This crate houses content definitions and loaders for RON/TOML data files:
//! - Engine tuning (data-driven via TOML)
//! - Effect record overrides (data-driven via RON)
//! - Entity templates (data-driven via RON)
//! - Scripted scenarios (data-driven via RON)
//!
//! Content is consumed when an engine is built and never appears in engine
//! state. All loaders use status-core types directly with serde.

pub mod scenario;
pub mod template;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use scenario::{Scenario, ScenarioSpawn, Step};
pub use template::{EntityTemplate, TemplateSet};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EffectLoader, EntityLoader, LoadResult, ScenarioLoader,
};
