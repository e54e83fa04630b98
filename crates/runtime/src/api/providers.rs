//! Collaborator abstractions injected into the runtime.
//!
//! The runtime never builds scenes or moves players itself. Callers plug in a
//! [`ContentProducer`] that materializes room content and an
//! [`OccupantRelocator`] that moves tracked occupants between rooms, so the
//! same runtime drives a game engine, a headless simulation, or test fixtures.
use std::fmt;

use async_trait::async_trait;
use level_core::{GridPos, NodeId, RoomArchetype};
use serde::{Deserialize, Serialize};

use super::errors::ContentError;

/// Opaque identifier of materialized room content, issued by the producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHandle(pub u64);

impl fmt::Display for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content#{}", self.0)
    }
}

/// World-space origin of a room, derived from its grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPlacement {
    pub x: f32,
    pub y: f32,
}

impl WorldPlacement {
    pub fn from_grid(grid: GridPos, spacing: f32) -> Self {
        Self {
            x: grid.x as f32 * spacing,
            y: grid.y as f32 * spacing,
        }
    }
}

/// Where occupants are placed when they arrive in a room.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryAnchor {
    pub node: NodeId,
    pub position: WorldPlacement,
}

/// Materializes and destroys the external representation of rooms.
///
/// Implementations may complete synchronously or suspend while content is
/// built. Handles returned by `instantiate` stay valid until `destroy`.
#[async_trait]
pub trait ContentProducer: Send + Sync {
    async fn instantiate(
        &self,
        archetype: &RoomArchetype,
        placement: WorldPlacement,
    ) -> Result<ContentHandle, ContentError>;

    async fn destroy(&self, handle: ContentHandle) -> Result<(), ContentError>;

    fn set_active(&self, handle: ContentHandle, active: bool) -> Result<(), ContentError>;
}

/// Moves every tracked occupant (players, companions) to a room's entry anchor.
pub trait OccupantRelocator: Send + Sync {
    fn relocate(&self, anchor: EntryAnchor);
}

/// Relocator for headless runs with nobody to move.
pub struct NoOccupants;

impl OccupantRelocator for NoOccupants {
    fn relocate(&self, anchor: EntryAnchor) {
        tracing::trace!(node = %anchor.node, "no occupants to relocate");
    }
}
