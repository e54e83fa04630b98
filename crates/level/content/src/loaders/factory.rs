//! Content factory for loading level content from a data directory.

use std::path::{Path, PathBuf};

use level_core::{ArchetypeCatalogue, GenerationConfig};

use crate::loaders::{ArchetypeLoader, ConfigLoader, LoadResult};

/// Content factory that loads all level content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── archetypes.ron
/// └── generation.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the room archetype catalogue from `archetypes.ron`.
    pub fn load_archetypes(&self) -> LoadResult<ArchetypeCatalogue> {
        let path = self.data_dir.join("archetypes.ron");
        ArchetypeLoader::load(&path)
    }

    /// Load generation parameters from `generation.toml`.
    ///
    /// A missing file yields the default parameters; a malformed one is an error.
    pub fn load_generation_config(&self) -> LoadResult<GenerationConfig> {
        let path = self.data_dir.join("generation.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no generation config, using defaults");
            return Ok(GenerationConfig::default());
        }
        ConfigLoader::load(&path)
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
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("archetypes.ron"),
            r#"(archetypes: [
                (name: "hall", category: Combat, doors: [North, South, East, West]),
                (name: "throne", category: Boss, doors: [South, West]),
            ])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_archetypes().unwrap().len(), 2);
        assert_eq!(
            factory.load_generation_config().unwrap(),
            GenerationConfig::default()
        );
    }
}
