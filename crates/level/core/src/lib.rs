//! Deterministic level logic shared by the runtime and offline tools.
//!
//! `level-core` defines the room graph, the archetype catalogue, reward
//! synthesis, and the retry-until-valid generator. Everything here is
//! synchronous and pure: the same [`SeedSource`] seed and the same inputs always
//! produce the same [`LevelGraph`].
pub mod catalogue;
pub mod config;
pub mod direction;
pub mod error;
pub mod generator;
pub mod graph;
pub mod reward;
pub mod seed;
pub mod weighted;

pub use catalogue::{ArchetypeCatalogue, RoomArchetype, RoomCategory};
pub use config::{DoorWeights, GenerationConfig, RewardConfig};
pub use direction::{CardinalDirection, DoorLayout};
pub use error::{
    ErrorSeverity, GenerationError, GraphError, LevelError, ValidationError,
};
pub use generator::{GeneratedLevel, GraphGenerator, validate};
pub use graph::{
    EdgeId, GridPos, LevelGraph, NodeId, Reachability, RoomEdge, RoomNode, RoomRole, RoomSpec,
    RoomState,
};
pub use reward::{Color, DoorType, Reward, RewardAssigner};
pub use seed::SeedSource;
pub use weighted::pick_weighted;
