//! Room archetypes: the static templates rooms are instantiated from.
//!
//! The catalogue is external asset data. The generator only reads it: an
//! archetype's door layout, category, spawn weight, and depth range are fixed
//! for the lifetime of a level.

use std::sync::Arc;

use crate::direction::{CardinalDirection, DoorLayout};
use crate::seed::SeedSource;
use crate::weighted::pick_weighted;

/// Gameplay category of a room.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RoomCategory {
    /// Standard fight; also the category the start room is drawn from
    Combat,
    /// Harder fight with better rewards
    Elite,
    /// Merchant room, no encounter
    Shop,
    /// Scripted event room, no encounter
    Event,
    /// Final encounter of the level
    Boss,
}

impl RoomCategory {
    /// Whether entering the room starts an encounter that must be cleared
    /// before its exits open.
    pub const fn has_encounter(self) -> bool {
        match self {
            RoomCategory::Combat | RoomCategory::Elite | RoomCategory::Boss => true,
            RoomCategory::Shop | RoomCategory::Event => false,
        }
    }
}

/// Static template for a room.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomArchetype {
    pub name: String,
    pub category: RoomCategory,
    pub doors: DoorLayout,
    pub spawn_weight: f32,
    pub min_depth: u32,
    pub max_depth: u32,
}

impl RoomArchetype {
    pub fn new(name: impl Into<String>, category: RoomCategory, doors: DoorLayout) -> Self {
        Self {
            name: name.into(),
            category,
            doors,
            spawn_weight: 1.0,
            min_depth: 0,
            max_depth: u32::MAX,
        }
    }

    pub fn with_spawn_weight(mut self, spawn_weight: f32) -> Self {
        self.spawn_weight = spawn_weight;
        self
    }

    pub fn with_depth_range(mut self, min_depth: u32, max_depth: u32) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self
    }

    pub fn allows_depth(&self, depth: u32) -> bool {
        (self.min_depth..=self.max_depth).contains(&depth)
    }

    pub fn has_door(&self, direction: CardinalDirection) -> bool {
        self.doors.has(direction)
    }
}

/// Read-only collection of archetypes indexed by category.
#[derive(Clone, Debug, Default)]
pub struct ArchetypeCatalogue {
    archetypes: Vec<Arc<RoomArchetype>>,
}

impl ArchetypeCatalogue {
    pub fn new(archetypes: Vec<RoomArchetype>) -> Self {
        Self {
            archetypes: archetypes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RoomArchetype>> {
        self.archetypes.iter()
    }

    pub fn by_category(&self, category: RoomCategory) -> impl Iterator<Item = &Arc<RoomArchetype>> {
        self.archetypes
            .iter()
            .filter(move |archetype| archetype.category == category)
    }

    pub fn has_category(&self, category: RoomCategory) -> bool {
        self.by_category(category).next().is_some()
    }

    /// Picks an archetype of `category` weighted by spawn weight.
    ///
    /// Candidates must allow `depth` (when given) and declare `required_door`
    /// (when given). Returns `None` when no candidate qualifies.
    pub fn pick(
        &self,
        category: RoomCategory,
        depth: Option<u32>,
        required_door: Option<CardinalDirection>,
        rng: &mut SeedSource,
    ) -> Option<Arc<RoomArchetype>> {
        let candidates: Vec<&Arc<RoomArchetype>> = self
            .by_category(category)
            .filter(|archetype| depth.is_none_or(|depth| archetype.allows_depth(depth)))
            .filter(|archetype| required_door.is_none_or(|door| archetype.has_door(door)))
            .collect();

        let weights: Vec<f32> = candidates.iter().map(|a| a.spawn_weight).collect();
        pick_weighted(&weights, rng).map(|index| Arc::clone(candidates[index]))
    }
}

impl FromIterator<RoomArchetype> for ArchetypeCatalogue {
    fn from_iter<I: IntoIterator<Item = RoomArchetype>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
