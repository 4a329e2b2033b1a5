//! Content loaders for reading engine data from files.
//!
//! TOML is used for flat tuning tables, RON for everything that carries
//! status-core enums.

pub mod config;
pub mod effects;
pub mod entities;
pub mod factory;
pub mod scenario;

pub use config::ConfigLoader;
pub use effects::{EffectLoader, EffectTable};
pub use entities::{EntityCatalog, EntityLoader};
pub use factory::ContentFactory;
pub use scenario::ScenarioLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
