use std::fmt;

use crate::direction::CardinalDirection;
use crate::reward::Reward;

use super::NodeId;

/// Identifier of a door edge, sequential within one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A directed door between two rooms.
///
/// `direction` is seen from the `from` room; the `to` room's door sits on the
/// opposite side.
#[derive(Clone, Debug)]
pub struct RoomEdge {
    pub(crate) id: EdgeId,
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) direction: CardinalDirection,
    pub(crate) reward: Option<Reward>,
    pub(crate) locked: bool,
    pub(crate) boss_door: bool,
}

impl RoomEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn direction(&self) -> CardinalDirection {
        self.direction
    }

    pub fn reward(&self) -> Option<&Reward> {
        self.reward.as_ref()
    }

    pub fn set_reward(&mut self, reward: Reward) {
        self.reward = Some(reward);
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether this door leads into the boss room.
    pub fn is_boss_door(&self) -> bool {
        self.boss_door
    }

    pub fn has_valid_reward(&self) -> bool {
        self.reward.as_ref().is_some_and(Reward::is_valid)
    }
}
