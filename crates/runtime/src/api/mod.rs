//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on loading and room orchestration.

pub mod errors;
pub mod providers;

pub use errors::{ContentError, Result, RuntimeError};
pub use providers::{
    ContentHandle, ContentProducer, EntryAnchor, NoOccupants, OccupantRelocator, WorldPlacement,
};
