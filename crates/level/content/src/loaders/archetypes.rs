//! Room archetype catalogue loader.

use std::collections::HashSet;
use std::path::Path;

use level_core::{ArchetypeCatalogue, CardinalDirection, DoorLayout, RoomArchetype, RoomCategory};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One archetype entry as written in `archetypes.ron`.
///
/// ```ron
/// (name: "crypt", category: Combat, doors: [North, East, West], min_depth: 2)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub name: String,
    pub category: RoomCategory,
    pub doors: Vec<CardinalDirection>,
    #[serde(default = "default_spawn_weight")]
    pub spawn_weight: f32,
    #[serde(default)]
    pub min_depth: u32,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_spawn_weight() -> f32 {
    1.0
}

impl ArchetypeSpec {
    pub fn into_archetype(self) -> RoomArchetype {
        let doors: DoorLayout = self.doors.into_iter().collect();
        RoomArchetype::new(self.name, self.category, doors)
            .with_spawn_weight(self.spawn_weight)
            .with_depth_range(self.min_depth, self.max_depth.unwrap_or(u32::MAX))
    }
}

/// Archetype catalogue structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeFile {
    pub archetypes: Vec<ArchetypeSpec>,
}

/// Loader for room archetype catalogues from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    /// Load an archetype catalogue from a RON file.
    pub fn load(path: &Path) -> LoadResult<ArchetypeCatalogue> {
        let content = read_file(path)?;
        let catalogue = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid archetype catalogue {}: {}", path.display(), e))?;

        tracing::debug!(path = %path.display(), archetypes = catalogue.len(), "archetypes loaded");
        Ok(catalogue)
    }

    /// Parse and check an archetype catalogue from RON text.
    pub fn parse(content: &str) -> LoadResult<ArchetypeCatalogue> {
        let file: ArchetypeFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetype RON: {}", e))?;

        let mut names = HashSet::new();
        for spec in &file.archetypes {
            if !names.insert(spec.name.as_str()) {
                anyhow::bail!("Archetype '{}' is defined twice", spec.name);
            }
            if spec.doors.is_empty() {
                anyhow::bail!("Archetype '{}' declares no doors", spec.name);
            }
            if spec.spawn_weight.is_nan() || spec.spawn_weight < 0.0 {
                anyhow::bail!(
                    "Archetype '{}' has invalid spawn weight {}",
                    spec.name,
                    spec.spawn_weight
                );
            }
            if spec.max_depth.is_some_and(|max| max < spec.min_depth) {
                anyhow::bail!("Archetype '{}' has an empty depth range", spec.name);
            }
        }

        Ok(file
            .archetypes
            .into_iter()
            .map(ArchetypeSpec::into_archetype)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGUE: &str = r#"(
        archetypes: [
            (name: "hall", category: Combat, doors: [North, South, East, West], spawn_weight: 2.5),
            (name: "crypt", category: Combat, doors: [North, West], min_depth: 2, max_depth: Some(6)),
            (name: "throne", category: Boss, doors: [South]),
        ],
    )"#;

    #[test]
    fn parses_doors_and_defaults() {
        let catalogue = ArchetypeLoader::parse(CATALOGUE).unwrap();
        assert_eq!(catalogue.len(), 3);

        let crypt = catalogue.iter().find(|a| a.name == "crypt").unwrap();
        assert_eq!(crypt.doors, DoorLayout::NORTH | DoorLayout::WEST);
        assert_eq!((crypt.min_depth, crypt.max_depth), (2, 6));

        let throne = catalogue.iter().find(|a| a.name == "throne").unwrap();
        assert_eq!(throne.spawn_weight, 1.0);
        assert_eq!(throne.max_depth, u32::MAX);
    }

    #[test]
    fn rejects_duplicates_and_doorless_rooms() {
        let duplicate = r#"(archetypes: [
            (name: "a", category: Shop, doors: [North]),
            (name: "a", category: Event, doors: [North]),
        ])"#;
        let err = ArchetypeLoader::parse(duplicate).unwrap_err();
        assert!(err.to_string().contains("defined twice"));

        let doorless = r#"(archetypes: [(name: "cell", category: Combat, doors: [])])"#;
        assert!(ArchetypeLoader::parse(doorless).is_err());
    }
}
