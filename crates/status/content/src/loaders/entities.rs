//! Entity template catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::template::{EntityTemplate, TemplateSet};

/// Entity catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCatalog {
    pub entities: Vec<EntityTemplate>,
}

/// Loader for entity templates from RON files.
pub struct EntityLoader;

impl EntityLoader {
    /// Load entity catalog from a RON file.
    ///
    /// Template names must be unique.
    pub fn load(path: &Path) -> LoadResult<TemplateSet> {
        let content = read_file(path)?;
        let catalog: EntityCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse entity catalog RON: {}", e))?;

        let mut names: Vec<&str> = Vec::with_capacity(catalog.entities.len());
        for template in &catalog.entities {
            if names.contains(&template.name.as_str()) {
                anyhow::bail!("Duplicate entity template '{}'", template.name);
            }
            names.push(&template.name);
        }

        Ok(TemplateSet::new(catalog.entities))
    }
}
