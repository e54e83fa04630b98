//! Runtime configuration.
use std::env;

/// Tuning knobs for content streaming and event delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Doors walked from the active room when preloading neighbours.
    pub preload_distance: u32,
    /// Manhattan grid distance beyond which loaded rooms are evicted.
    pub evict_distance: u32,
    /// World units between neighbouring grid cells.
    pub room_spacing: f32,
    pub event_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_PRELOAD_DISTANCE: u32 = 2;
    pub const DEFAULT_EVICT_DISTANCE: u32 = 2;
    pub const DEFAULT_ROOM_SPACING: f32 = 50.0;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `LEVEL_PRELOAD_DISTANCE` - Preload walk depth in doors (default: 2)
    /// - `LEVEL_EVICT_DISTANCE` - Eviction threshold in grid cells (default: 2)
    /// - `LEVEL_ROOM_SPACING` - World units per grid cell (default: 50.0)
    /// - `LEVEL_EVENT_BUFFER` - Event channel capacity per topic (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(distance) = read_env::<u32>("LEVEL_PRELOAD_DISTANCE") {
            config.preload_distance = distance;
        }
        if let Some(distance) = read_env::<u32>("LEVEL_EVICT_DISTANCE") {
            config.evict_distance = distance;
        }
        if let Some(spacing) = read_env::<f32>("LEVEL_ROOM_SPACING")
            && spacing.is_finite()
            && spacing > 0.0
        {
            config.room_spacing = spacing;
        }
        if let Some(capacity) = read_env::<usize>("LEVEL_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            preload_distance: Self::DEFAULT_PRELOAD_DISTANCE,
            evict_distance: Self::DEFAULT_EVICT_DISTANCE,
            room_spacing: Self::DEFAULT_ROOM_SPACING,
            event_buffer_size: 100,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
