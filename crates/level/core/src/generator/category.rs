//! Depth-weighted room category selection.

use crate::catalogue::RoomCategory;
use crate::config::GenerationConfig;
use crate::seed::SeedSource;

/// Progress below which only combat and elite rooms are drawn.
const EARLY_PROGRESS: f32 = 0.33;
/// Progress from which elite and event chances are raised.
const LATE_PROGRESS: f32 = 0.66;
const LATE_BOOST: f32 = 1.5;

/// Picks the category of a room placed at `depth` of a level `total_depth` deep.
///
/// Chances cascade: elite is rolled first, then shop, then event; combat is
/// the fallback when every roll misses.
pub(crate) fn choose_category(
    depth: u32,
    total_depth: u32,
    config: &GenerationConfig,
    rng: &mut SeedSource,
) -> RoomCategory {
    let progress = depth as f32 / total_depth.max(1) as f32;

    if progress < EARLY_PROGRESS {
        return if rng.chance(config.elite_chance) {
            RoomCategory::Elite
        } else {
            RoomCategory::Combat
        };
    }

    let boost = if progress >= LATE_PROGRESS { LATE_BOOST } else { 1.0 };
    if rng.chance(config.elite_chance * boost) {
        RoomCategory::Elite
    } else if rng.chance(config.shop_chance) {
        RoomCategory::Shop
    } else if rng.chance(config.event_chance * boost) {
        RoomCategory::Event
    } else {
        RoomCategory::Combat
    }
}
