/// Tunable parameters for level generation.
///
/// Loaded from `generation.toml` by the content crate; every field has a
/// default so partial files are accepted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationConfig {
    /// Inclusive lower bound of non-boss rooms (start room included).
    pub min_rooms: u32,
    /// Inclusive upper bound of non-boss rooms (start room included).
    pub max_rooms: u32,
    /// Inclusive range of additional exits synthesized per placed room.
    pub min_extra_exits: u32,
    pub max_extra_exits: u32,
    /// Chance an extra exit links to an existing neighbour instead of a new room.
    pub connect_existing_chance: f32,
    pub elite_chance: f32,
    pub shop_chance: f32,
    pub event_chance: f32,
    /// Path-growth iterations granted per requested room before an attempt gives up.
    pub growth_tries_per_room: u32,
    pub max_attempts: u32,
    pub rewards: RewardConfig,
}

impl GenerationConfig {
    pub const DEFAULT_MIN_ROOMS: u32 = 8;
    pub const DEFAULT_MAX_ROOMS: u32 = 12;
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    pub fn new() -> Self {
        Self {
            min_rooms: Self::DEFAULT_MIN_ROOMS,
            max_rooms: Self::DEFAULT_MAX_ROOMS,
            min_extra_exits: 2,
            max_extra_exits: 3,
            connect_existing_chance: 0.3,
            elite_chance: 0.15,
            shop_chance: 0.15,
            event_chance: 0.15,
            growth_tries_per_room: 4,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            rewards: RewardConfig::default(),
        }
    }

    pub fn with_room_range(mut self, min_rooms: u32, max_rooms: u32) -> Self {
        self.min_rooms = min_rooms;
        self.max_rooms = max_rooms;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reward synthesis knobs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardConfig {
    pub weights: DoorWeights,
    /// Multiplier applied to a door type already offered by a sibling door.
    pub duplicate_penalty: f32,
    pub currency_base: u32,
    pub currency_per_depth: u32,
    pub elite_base: u32,
    pub elite_per_depth: u32,
    /// Inclusive upper bound of the random bonus added to scaled amounts.
    pub amount_jitter: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            weights: DoorWeights::default(),
            duplicate_penalty: 0.1,
            currency_base: 50,
            currency_per_depth: 10,
            elite_base: 100,
            elite_per_depth: 20,
            amount_jitter: 10,
        }
    }
}

/// Base weight per door type before depth adjustment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DoorWeights {
    pub currency: f32,
    pub upgrade: f32,
    pub weapon: f32,
    pub consumable: f32,
    pub elite: f32,
    pub shop: f32,
    pub event: f32,
}

impl Default for DoorWeights {
    fn default() -> Self {
        Self {
            currency: 0.35,
            upgrade: 0.25,
            weapon: 0.15,
            consumable: 0.10,
            elite: 0.08,
            shop: 0.05,
            event: 0.02,
        }
    }
}
