//! Door rewards: what the player is offered behind each door.

mod assigner;

pub use assigner::RewardAssigner;

/// Category of benefit offered behind a door.
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
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DoorType {
    Currency,
    Upgrade,
    Weapon,
    Consumable,
    Elite,
    Shop,
    Event,
    /// Fixed reward of the door into the boss room; never drawn by weight.
    Boss,
}

impl DoorType {
    pub const fn display_name(self) -> &'static str {
        match self {
            DoorType::Currency => "Gold Cache",
            DoorType::Upgrade => "Upgrade Altar",
            DoorType::Weapon => "Armory",
            DoorType::Consumable => "Supply Crate",
            DoorType::Elite => "Elite Challenge",
            DoorType::Shop => "Wandering Merchant",
            DoorType::Event => "Mystery",
            DoorType::Boss => "Guardian's Lair",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            DoorType::Currency => Color::rgb(255, 200, 40),
            DoorType::Upgrade => Color::rgb(80, 160, 255),
            DoorType::Weapon => Color::rgb(200, 200, 210),
            DoorType::Consumable => Color::rgb(90, 220, 120),
            DoorType::Elite => Color::rgb(190, 60, 230),
            DoorType::Shop => Color::rgb(240, 140, 40),
            DoorType::Event => Color::rgb(60, 220, 220),
            DoorType::Boss => Color::rgb(220, 30, 30),
        }
    }

    /// Whether rewards of this type carry a depth-scaled amount.
    pub const fn has_amount(self) -> bool {
        matches!(self, DoorType::Currency | DoorType::Elite)
    }
}

/// 8-bit RGB color used by door presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Reward payload attached to a door.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub door_type: DoorType,
    pub name: String,
    pub color: Color,
    /// Depth-scaled quantity for currency and elite rewards.
    pub amount: Option<u32>,
}

impl Reward {
    pub fn new(door_type: DoorType) -> Self {
        Self {
            door_type,
            name: door_type.display_name().to_owned(),
            color: door_type.color(),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn boss() -> Self {
        Self::new(DoorType::Boss)
    }

    /// A reward must be named to be presentable.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_type_has_a_presentable_default() {
        for door_type in DoorType::iter() {
            let reward = Reward::new(door_type);
            assert!(reward.is_valid(), "{door_type} has no display name");
            assert_eq!(reward.color, door_type.color());
        }
    }

    #[test]
    fn blank_names_are_invalid() {
        let mut reward = Reward::new(DoorType::Weapon);
        reward.name = "   ".to_owned();
        assert!(!reward.is_valid());
    }
}
