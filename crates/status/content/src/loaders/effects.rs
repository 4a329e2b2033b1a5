//! Effect record overrides.
//!
//! The file lists complete [`EffectMetadata`] records; each one replaces the
//! built-in record of the same kind. Kinds not listed keep their built-in
//! behaviour.

use std::path::Path;

use serde::{Deserialize, Serialize};
use status_core::{EffectMetadata, EffectRegistry};

use crate::loaders::{LoadResult, read_file};

/// Effect table structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectTable {
    pub effects: Vec<EffectMetadata>,
}

/// Loader for effect overrides from RON files.
pub struct EffectLoader;

impl EffectLoader {
    /// Load the raw override records.
    pub fn load(path: &Path) -> LoadResult<Vec<EffectMetadata>> {
        let content = read_file(path)?;
        let table: EffectTable = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect table RON: {}", e))?;

        Ok(table.effects)
    }

    /// Load overrides and merge them over the built-in registry.
    pub fn load_registry(path: &Path) -> LoadResult<EffectRegistry> {
        let overrides = Self::load(path)?;
        let count = overrides.len();
        let registry = EffectRegistry::builtin()
            .with_overrides(overrides)
            .map_err(|e| anyhow::anyhow!("Invalid effect table {}: {}", path.display(), e))?;

        tracing::debug!(path = %path.display(), overrides = count, "effect registry loaded");
        Ok(registry)
    }
}
