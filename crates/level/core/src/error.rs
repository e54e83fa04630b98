//! Error taxonomy for level-core.
//!
//! Graph construction, validation, and generation each get their own error
//! enum. All of them are classified through [`LevelError::severity`] so callers
//! can decide between retrying, rejecting input, or aborting the level.
//!
//! # Recovery policy
//!
//! - Only a failed *generation attempt* is retried, and only inside the
//!   generator (bounded by the configured attempt limit).
//! - Catalogue deficiencies are fatal immediately: no amount of retrying can
//!   produce a room category that does not exist.

use crate::catalogue::RoomCategory;
use crate::direction::CardinalDirection;
use crate::graph::{EdgeId, NodeId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Another attempt with fresh randomness may succeed.
    Recoverable,

    /// Invalid input or request; retrying without changes cannot help.
    Validation,

    /// The level cannot be produced or continued.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all level errors.
pub trait LevelError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for the error variant, for logs and tests.
    fn error_code(&self) -> &'static str;
}

/// Rejected graph mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} does not exist in this graph")]
    UnknownNode(NodeId),

    #[error("edge {0} does not exist in this graph")]
    UnknownEdge(EdgeId),

    #[error("edge from {0} to itself is not allowed")]
    SelfLoop(NodeId),

    #[error("node {node} has no door on its {direction} side")]
    MissingDoor {
        node: NodeId,
        direction: CardinalDirection,
    },

    #[error("door on the {direction} side of node {node} already carries an edge")]
    DoorOccupied {
        node: NodeId,
        direction: CardinalDirection,
    },

    #[error("graph already has a start room ({0})")]
    DuplicateStart(NodeId),

    #[error("graph already has a boss room ({0})")]
    DuplicateBoss(NodeId),
}

impl LevelError for GraphError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownNode(_) => "GRAPH_UNKNOWN_NODE",
            Self::UnknownEdge(_) => "GRAPH_UNKNOWN_EDGE",
            Self::SelfLoop(_) => "GRAPH_SELF_LOOP",
            Self::MissingDoor { .. } => "GRAPH_MISSING_DOOR",
            Self::DoorOccupied { .. } => "GRAPH_DOOR_OCCUPIED",
            Self::DuplicateStart(_) => "GRAPH_DUPLICATE_START",
            Self::DuplicateBoss(_) => "GRAPH_DUPLICATE_BOSS",
        }
    }
}

/// A generated graph that violates a level invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("graph has no start room")]
    MissingStart,

    #[error("graph has no boss room")]
    MissingBoss,

    #[error("boss room {boss} is not reachable from start room {start}")]
    BossUnreachable { start: NodeId, boss: NodeId },

    #[error("room {0} has no connected doors")]
    OrphanRoom(NodeId),

    #[error("room {0} has no exits")]
    DeadEnd(NodeId),

    #[error("edge {0} has no valid reward")]
    MissingReward(EdgeId),

    #[error("edge {0} does not pair matching doors on both rooms")]
    DoorMismatch(EdgeId),

    #[error("only {placed} of {requested} rooms could be placed")]
    TooFewRooms { placed: u32, requested: u32 },

    #[error("no room could host a door to the boss room")]
    BossPlacement,
}

impl LevelError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingStart => "VALIDATION_MISSING_START",
            Self::MissingBoss => "VALIDATION_MISSING_BOSS",
            Self::BossUnreachable { .. } => "VALIDATION_BOSS_UNREACHABLE",
            Self::OrphanRoom(_) => "VALIDATION_ORPHAN_ROOM",
            Self::DeadEnd(_) => "VALIDATION_DEAD_END",
            Self::MissingReward(_) => "VALIDATION_MISSING_REWARD",
            Self::DoorMismatch(_) => "VALIDATION_DOOR_MISMATCH",
            Self::TooFewRooms { .. } => "VALIDATION_TOO_FEW_ROOMS",
            Self::BossPlacement => "VALIDATION_BOSS_PLACEMENT",
        }
    }
}

/// Level generation failed; no partial graph is exposed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("no valid level after {attempts} attempts (last failure: {last_failure})")]
    AttemptsExhausted {
        attempts: u32,
        last_failure: ValidationError,
    },

    #[error("archetype catalogue has no usable {0} rooms")]
    MissingCategory(RoomCategory),

    #[error("invalid generation config: {0}")]
    InvalidConfig(&'static str),
}

impl LevelError for GenerationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AttemptsExhausted { .. } | Self::MissingCategory(_) => ErrorSeverity::Fatal,
            Self::InvalidConfig(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AttemptsExhausted { .. } => "GENERATION_ATTEMPTS_EXHAUSTED",
            Self::MissingCategory(_) => "GENERATION_MISSING_CATEGORY",
            Self::InvalidConfig(_) => "GENERATION_INVALID_CONFIG",
        }
    }
}
