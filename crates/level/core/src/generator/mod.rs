//! Level generation: build, validate, retry.
//!
//! [`GraphGenerator`] turns a [`GenerationConfig`] and an
//! [`ArchetypeCatalogue`] into a validated [`LevelGraph`]. Each attempt runs
//! on its own stream derived from the caller's seed, so a given seed always
//! reproduces the same sequence of attempts and therefore the same level.
//!
//! Construction steps per attempt:
//! 1. start room at the origin
//! 2. path growth from random parents, with depth-weighted categories
//! 3. two or three extra exits for every newly placed room
//! 4. boss room beyond the deepest room that can host its door
//! 5. repair of isolated rooms
//! 6. reward assignment for every room except the boss
//! 7. validation
//!
//! Failed attempts are logged and retried up to `max_attempts`. Catalogue
//! deficiencies are reported before the first attempt because retrying cannot
//! fix them.

mod attempt;
mod category;
mod validate;

pub use validate::validate;

use tracing::{info, warn};

use crate::catalogue::{ArchetypeCatalogue, RoomCategory};
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::graph::LevelGraph;
use crate::reward::RewardAssigner;
use crate::seed::SeedSource;

use attempt::Attempt;

/// Successful generation result.
#[derive(Clone, Debug)]
pub struct GeneratedLevel {
    pub graph: LevelGraph,
    /// Outer seed the level was generated from.
    pub seed: u64,
    /// 1-based number of the attempt that produced `graph`.
    pub attempts: u32,
}

/// Builds level graphs from a catalogue of room archetypes.
#[derive(Clone, Debug)]
pub struct GraphGenerator {
    config: GenerationConfig,
    catalogue: ArchetypeCatalogue,
    assigner: RewardAssigner,
}

impl GraphGenerator {
    pub fn new(config: GenerationConfig, catalogue: ArchetypeCatalogue) -> Self {
        let assigner = RewardAssigner::new(config.rewards.clone());
        Self {
            config,
            catalogue,
            assigner,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn catalogue(&self) -> &ArchetypeCatalogue {
        &self.catalogue
    }

    /// Generates a level from `seed`.
    ///
    /// Attempt `k` draws from `seed.derive(k)`; the state of `seed` itself is
    /// never consumed.
    pub fn generate(&self, seed: &SeedSource) -> Result<GeneratedLevel, GenerationError> {
        self.check_config()?;
        self.check_catalogue()?;

        let max_attempts = self.config.max_attempts;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let rng = seed.derive(u64::from(attempt));

            match Attempt::new(&self.config, &self.catalogue, &self.assigner, rng).run() {
                Ok(graph) => {
                    info!(
                        seed = seed.seed(),
                        attempt,
                        rooms = graph.node_count(),
                        doors = graph.edge_count(),
                        "level generated"
                    );
                    return Ok(GeneratedLevel {
                        graph,
                        seed: seed.seed(),
                        attempts: attempt,
                    });
                }
                Err(failure) if attempt >= max_attempts => {
                    warn!(seed = seed.seed(), attempt, %failure, "generation attempts exhausted");
                    return Err(GenerationError::AttemptsExhausted {
                        attempts: attempt,
                        last_failure: failure,
                    });
                }
                Err(failure) => {
                    warn!(seed = seed.seed(), attempt, %failure, "generation attempt failed");
                }
            }
        }
    }

    /// Shorthand for [`GraphGenerator::generate`] with a fresh [`SeedSource`].
    pub fn generate_with_seed(&self, seed: u64) -> Result<GeneratedLevel, GenerationError> {
        self.generate(&SeedSource::new(seed))
    }

    fn check_config(&self) -> Result<(), GenerationError> {
        let config = &self.config;
        if config.min_rooms == 0 {
            return Err(GenerationError::InvalidConfig("min_rooms must be at least 1"));
        }
        if config.min_rooms > config.max_rooms {
            return Err(GenerationError::InvalidConfig("min_rooms exceeds max_rooms"));
        }
        if config.min_extra_exits > config.max_extra_exits {
            return Err(GenerationError::InvalidConfig(
                "min_extra_exits exceeds max_extra_exits",
            ));
        }
        if config.max_attempts == 0 {
            return Err(GenerationError::InvalidConfig("max_attempts must be at least 1"));
        }
        Ok(())
    }

    fn check_catalogue(&self) -> Result<(), GenerationError> {
        for category in [RoomCategory::Combat, RoomCategory::Boss] {
            if !self
                .catalogue
                .by_category(category)
                .any(|archetype| !archetype.doors.is_empty())
            {
                return Err(GenerationError::MissingCategory(category));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::RoomArchetype;
    use crate::direction::DoorLayout;

    fn catalogue() -> ArchetypeCatalogue {
        ArchetypeCatalogue::new(vec![
            RoomArchetype::new("hall", RoomCategory::Combat, DoorLayout::all()),
            RoomArchetype::new("arena", RoomCategory::Boss, DoorLayout::all()),
        ])
    }

    #[test]
    fn rejects_inverted_room_range() {
        let generator = GraphGenerator::new(
            GenerationConfig::default().with_room_range(6, 4),
            catalogue(),
        );
        assert_eq!(
            generator.generate_with_seed(1).unwrap_err(),
            GenerationError::InvalidConfig("min_rooms exceeds max_rooms")
        );
    }

    #[test]
    fn doorless_combat_rooms_do_not_count() {
        let generator = GraphGenerator::new(
            GenerationConfig::default(),
            ArchetypeCatalogue::new(vec![
                RoomArchetype::new("sealed", RoomCategory::Combat, DoorLayout::empty()),
                RoomArchetype::new("arena", RoomCategory::Boss, DoorLayout::all()),
            ]),
        );
        assert_eq!(
            generator.generate_with_seed(1).unwrap_err(),
            GenerationError::MissingCategory(RoomCategory::Combat)
        );
    }

    #[test]
    fn single_room_level_attaches_boss_to_start() {
        let generator = GraphGenerator::new(
            GenerationConfig::default().with_room_range(1, 1),
            catalogue(),
        );
        let level = generator.generate_with_seed(9).unwrap();

        assert_eq!(level.graph.node_count(), 2);
        let start = level.graph.start().unwrap();
        let boss = level.graph.boss().unwrap();
        assert_eq!(level.graph.shortest_path_to_boss(start), vec![start, boss]);
    }
}
