//! Data-driven level content and loaders.
//!
//! This crate houses the room archetype catalogue and generation parameters:
//! - a built-in catalogue usable without any data files
//! - room archetype catalogues (data-driven via RON)
//! - generation parameters (data-driven via TOML)
//!
//! Content is consumed by the generator and never appears in runtime state.

pub mod builtin;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use builtin::builtin_catalogue;

#[cfg(feature = "loaders")]
pub use loaders::{ArchetypeLoader, ArchetypeSpec, ConfigLoader, ContentFactory, LoadResult};
