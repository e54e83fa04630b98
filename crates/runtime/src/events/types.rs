//! Event types for different topics.

use level_core::{EdgeId, NodeId, RoomCategory};
use serde::{Deserialize, Serialize};

/// Room lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomEvent {
    /// The player entered a room and its content is active.
    Entered {
        node: NodeId,
        category: RoomCategory,
        depth: u32,
    },

    /// The room's challenge was resolved and its exits unlocked.
    Completed { node: NodeId, unlocked: usize },

    /// A transition through `via` finished.
    TransitionCompleted {
        previous: NodeId,
        current: NodeId,
        via: EdgeId,
    },
}

/// Level-wide notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// A level graph was generated and the runtime is ready to start.
    Generated {
        seed: u64,
        attempts: u32,
        rooms: usize,
    },

    /// The boss room's encounter was cleared.
    Won { boss: NodeId },
}
