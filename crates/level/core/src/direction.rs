//! Compass directions and per-room door layouts.

use bitflags::bitflags;

/// One of the four door slots a room can expose on the placement grid.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::East,
        CardinalDirection::West,
    ];

    /// Grid offset of the neighbouring cell behind this door.
    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }

    /// The door the neighbouring room must expose to pair with this one.
    pub const fn opposite(self) -> Self {
        match self {
            CardinalDirection::North => CardinalDirection::South,
            CardinalDirection::South => CardinalDirection::North,
            CardinalDirection::East => CardinalDirection::West,
            CardinalDirection::West => CardinalDirection::East,
        }
    }

    pub const fn as_door(self) -> DoorLayout {
        match self {
            CardinalDirection::North => DoorLayout::NORTH,
            CardinalDirection::South => DoorLayout::SOUTH,
            CardinalDirection::East => DoorLayout::EAST,
            CardinalDirection::West => DoorLayout::WEST,
        }
    }
}

bitflags! {
    /// Set of compass directions on which a room declares (or uses) a door.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DoorLayout: u8 {
        const NORTH = 1 << 0;
        const SOUTH = 1 << 1;
        const EAST  = 1 << 2;
        const WEST  = 1 << 3;
    }
}

impl DoorLayout {
    pub fn has(self, direction: CardinalDirection) -> bool {
        self.contains(direction.as_door())
    }

    /// Directions present in this layout, in [`CardinalDirection::ALL`] order.
    pub fn directions(self) -> Vec<CardinalDirection> {
        CardinalDirection::ALL
            .into_iter()
            .filter(|direction| self.has(*direction))
            .collect()
    }

    pub fn door_count(self) -> u32 {
        self.bits().count_ones()
    }
}

impl FromIterator<CardinalDirection> for DoorLayout {
    fn from_iter<I: IntoIterator<Item = CardinalDirection>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DoorLayout::empty(), |layout, direction| {
                layout | direction.as_door()
            })
    }
}
