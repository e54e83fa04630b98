//! Generation parameter loader.

use std::path::Path;

use level_core::GenerationConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for generation parameters from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load generation parameters from a TOML file.
    ///
    /// Missing keys fall back to [`GenerationConfig::default`].
    pub fn load(path: &Path) -> LoadResult<GenerationConfig> {
        let content = read_file(path)?;
        let config: GenerationConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse generation config TOML: {}", e))?;

        Ok(config)
    }
}
