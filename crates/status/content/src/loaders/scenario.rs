//! Scenario loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::scenario::Scenario;

/// Loader for scripted scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        let scenario: Scenario = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        let duplicates = scenario.duplicate_spawns();
        if !duplicates.is_empty() {
            anyhow::bail!(
                "Scenario '{}' spawns entity ids more than once: {:?}",
                scenario.name,
                duplicates
            );
        }

        Ok(scenario)
    }
}
