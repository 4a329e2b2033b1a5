//! Engine configuration loader.

use std::path::Path;

use status_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`EngineConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_reentry_depth == 0 {
            anyhow::bail!("max_reentry_depth must be at least 1");
        }
        if config.max_rate_reduction > EngineConfig::CHANCE_SCALE {
            tracing::warn!(
                value = config.max_rate_reduction,
                "max_rate_reduction above 100% is treated as 100%"
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            game_seed = 42

            [logout]
            clear_debuffs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.game_seed, 42);
        assert!(config.logout.clear_debuffs);
        assert!(!config.logout.clear_buffs);
        assert_eq!(
            config.max_reentry_depth,
            EngineConfig::DEFAULT_MAX_REENTRY_DEPTH
        );
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(ConfigLoader::parse("max_reentry_depth = 0").is_err());
    }
}
