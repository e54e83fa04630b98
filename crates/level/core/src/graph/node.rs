use std::fmt;
use std::sync::Arc;

use crate::catalogue::{RoomArchetype, RoomCategory};
use crate::direction::{CardinalDirection, DoorLayout};

/// Identifier of a room, unique within one [`super::LevelGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer placement cell. Only used to lay rooms out, never for gameplay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell `steps` cells away through `direction`.
    pub fn step(self, direction: CardinalDirection, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * steps,
            y: self.y + dy * steps,
        }
    }

    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Default for GridPos {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Progress state of a room during play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RoomState {
    #[default]
    Unvisited,
    Available,
    Visited,
    Locked,
}

/// Structural role of a room in the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoomRole {
    #[default]
    Standard,
    Start,
    Boss,
}

/// Parameters for [`super::LevelGraph::add_node`].
#[derive(Clone, Debug)]
pub struct RoomSpec {
    pub archetype: Arc<RoomArchetype>,
    pub grid: GridPos,
    pub depth: u32,
    pub role: RoomRole,
}

impl RoomSpec {
    pub fn new(archetype: Arc<RoomArchetype>, grid: GridPos, depth: u32) -> Self {
        Self {
            archetype,
            grid,
            depth,
            role: RoomRole::Standard,
        }
    }

    pub fn start(archetype: Arc<RoomArchetype>) -> Self {
        Self {
            role: RoomRole::Start,
            ..Self::new(archetype, GridPos::ORIGIN, 0)
        }
    }

    pub fn boss(archetype: Arc<RoomArchetype>, grid: GridPos, depth: u32) -> Self {
        Self {
            role: RoomRole::Boss,
            ..Self::new(archetype, grid, depth)
        }
    }
}

/// A room instance in a generated level.
#[derive(Clone, Debug)]
pub struct RoomNode {
    pub(crate) id: NodeId,
    pub(crate) grid: GridPos,
    pub(crate) archetype: Arc<RoomArchetype>,
    pub(crate) depth: u32,
    pub(crate) role: RoomRole,
    pub(crate) state: RoomState,
    pub(crate) connected: DoorLayout,
}

impl RoomNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn grid(&self) -> GridPos {
        self.grid
    }

    pub fn archetype(&self) -> &Arc<RoomArchetype> {
        &self.archetype
    }

    pub fn category(&self) -> RoomCategory {
        self.archetype.category
    }

    /// BFS distance from the start room at the time the room was placed.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn role(&self) -> RoomRole {
        self.role
    }

    pub fn is_start(&self) -> bool {
        self.role == RoomRole::Start
    }

    pub fn is_boss(&self) -> bool {
        self.role == RoomRole::Boss
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    /// Door slots that already carry an edge (incoming or outgoing).
    pub fn connected(&self) -> DoorLayout {
        self.connected
    }

    /// Door slots declared by the archetype and not yet used by an edge.
    pub fn free_doors(&self) -> DoorLayout {
        self.archetype.doors - self.connected
    }

    pub fn has_free_door(&self, direction: CardinalDirection) -> bool {
        self.free_doors().has(direction)
    }
}
