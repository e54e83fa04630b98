//! Built-in room archetypes.
//!
//! A small catalogue covering every room category, used when no data
//! directory is configured and by tests across the workspace.

use level_core::{ArchetypeCatalogue, DoorLayout, RoomArchetype, RoomCategory};

pub fn builtin_catalogue() -> ArchetypeCatalogue {
    let all = DoorLayout::all();
    let vertical = DoorLayout::NORTH | DoorLayout::SOUTH;
    let horizontal = DoorLayout::EAST | DoorLayout::WEST;
    let tee = DoorLayout::WEST | DoorLayout::EAST | DoorLayout::NORTH;

    ArchetypeCatalogue::new(vec![
        RoomArchetype::new("guard_room", RoomCategory::Combat, all).with_spawn_weight(3.0),
        RoomArchetype::new("long_hall", RoomCategory::Combat, vertical).with_spawn_weight(1.5),
        RoomArchetype::new("gallery", RoomCategory::Combat, horizontal).with_spawn_weight(1.5),
        RoomArchetype::new("crypt", RoomCategory::Combat, tee).with_depth_range(2, u32::MAX),
        RoomArchetype::new("champion_pit", RoomCategory::Elite, all).with_depth_range(1, u32::MAX),
        RoomArchetype::new("bazaar", RoomCategory::Shop, all),
        RoomArchetype::new("shrine", RoomCategory::Event, all),
        RoomArchetype::new("throne_room", RoomCategory::Boss, all),
    ])
}
