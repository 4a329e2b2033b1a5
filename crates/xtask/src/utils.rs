//! Utility functions for xtask commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use status_content::{ContentFactory, Scenario, ScenarioLoader};

/// Content shipped with the workspace.
pub fn default_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../status/content/data")
}

pub fn factory(data_dir: Option<PathBuf>) -> ContentFactory {
    ContentFactory::new(data_dir.unwrap_or_else(default_data_dir))
}

/// Loads a scenario by name from the content directory, or from a path when
/// the argument names an existing file.
pub fn resolve_scenario(factory: &ContentFactory, scenario: &str) -> Result<Scenario> {
    let path = Path::new(scenario);
    if path.is_file() {
        return ScenarioLoader::load(path);
    }

    factory.load_scenario(scenario).with_context(|| {
        format!(
            "Scenario '{}' not found\n\nHint: available scenarios are in {}",
            scenario,
            factory.data_dir().join("scenarios").display()
        )
    })
}
