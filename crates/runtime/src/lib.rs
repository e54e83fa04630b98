//! Async runtime that plays a generated level.
//!
//! This crate wires the room graph from `level-core` to injected content and
//! occupant collaborators. Consumers build a [`Level`], enter its start room,
//! and drive it with encounter and transition requests while subscribing to
//! events.
//!
//! Modules are organized by responsibility:
//! - [`level`] hosts the orchestrator and builder
//! - [`room`] is the room state machine and transition logic
//! - [`loader`] streams room content in and out around the player
//! - [`api`] exposes the collaborator traits and error types
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`memory`] holds in-memory collaborators for headless runs and tests
pub mod api;
pub mod config;
pub mod events;
pub mod level;
pub mod loader;
pub mod memory;
pub mod room;

pub use api::{
    ContentError, ContentHandle, ContentProducer, EntryAnchor, NoOccupants, OccupantRelocator,
    Result, RuntimeError, WorldPlacement,
};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, LevelEvent, RoomEvent, Topic};
pub use level::{Level, LevelBuilder};
pub use loader::{LoadRequest, LoadedRoom, RoomContentLoader};
pub use memory::{ContentRecord, InMemoryProducer, RecordingRelocator};
pub use room::{RoomPhase, RoomRuntime};
