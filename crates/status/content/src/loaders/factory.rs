//! Content factory for building engine inputs from data files.

use std::path::{Path, PathBuf};

use status_core::{EffectRegistry, EngineConfig};

use crate::loaders::{ConfigLoader, EffectLoader, EntityLoader, LoadResult, ScenarioLoader};
use crate::scenario::Scenario;
use crate::template::TemplateSet;

/// Content factory that loads all engine content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── entities.ron
/// └── scenarios/
///     ├── poison_duel.ron
///     └── berserk_cycle.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Build the effect registry, applying `effects.ron` when present.
    pub fn load_registry(&self) -> LoadResult<EffectRegistry> {
        let path = self.data_dir.join("effects.ron");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no effect overrides; using built-in table");
            return Ok(EffectRegistry::builtin());
        }
        EffectLoader::load_registry(&path)
    }

    /// Load entity templates from `entities.ron`.
    pub fn load_entities(&self) -> LoadResult<TemplateSet> {
        let path = self.data_dir.join("entities.ron");
        EntityLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.scenario_path(name);
        ScenarioLoader::load(&path)
    }

    /// Names of every scenario file, sorted.
    pub fn scenario_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("scenarios");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn scenario_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("scenarios").join(format!("{}.ron", name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.scenario_path("duel"),
            Path::new("/tmp/data/scenarios/duel.ron")
        );
    }
}
