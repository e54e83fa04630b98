//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the content producer, the level graph, and generation
//! so clients can bubble them up with consistent context.
use thiserror::Error;

use level_core::{
    EdgeId, ErrorSeverity, GenerationError, GraphError, LevelError, NodeId,
};

use super::providers::ContentHandle;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Failure reported by a [`ContentProducer`](super::ContentProducer).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("failed to instantiate content for archetype '{archetype}': {reason}")]
    Instantiate { archetype: String, reason: String },

    #[error("failed to destroy content {handle}: {reason}")]
    Destroy { handle: ContentHandle, reason: String },

    #[error("failed to toggle content {handle}: {reason}")]
    Activate { handle: ContentHandle, reason: String },

    #[error("content handle {0} is not known to the producer")]
    UnknownHandle(ContentHandle),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no room is active")]
    NoActiveRoom,

    #[error("level graph has no start room")]
    MissingStart,

    #[error("room {0} does not exist in the level graph")]
    UnknownNode(NodeId),

    #[error("door {0} does not exist in the level graph")]
    UnknownEdge(EdgeId),

    #[error("door {edge} leads {from} -> {to}, not {current} -> {target}")]
    EdgeMismatch {
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
        current: NodeId,
        target: NodeId,
    },

    #[error("door {0} is locked")]
    EdgeLocked(EdgeId),

    #[error("room {0} has no loaded content")]
    RoomNotLoaded(NodeId),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("room content registry lock poisoned")]
    LockPoisoned,

    #[error("level generation failed")]
    Generation(#[from] GenerationError),

    #[error("level requires a {0} before building")]
    MissingCollaborator(&'static str),
}

impl LevelError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActiveRoom
            | Self::MissingStart
            | Self::UnknownNode(_)
            | Self::UnknownEdge(_)
            | Self::EdgeMismatch { .. }
            | Self::EdgeLocked(_)
            | Self::RoomNotLoaded(_)
            | Self::MissingCollaborator(_) => ErrorSeverity::Validation,
            Self::Content(_) => ErrorSeverity::Recoverable,
            Self::Graph(err) => err.severity(),
            Self::Generation(err) => err.severity(),
            Self::LockPoisoned => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveRoom => "RUNTIME_NO_ACTIVE_ROOM",
            Self::MissingStart => "RUNTIME_MISSING_START",
            Self::UnknownNode(_) => "RUNTIME_UNKNOWN_NODE",
            Self::UnknownEdge(_) => "RUNTIME_UNKNOWN_EDGE",
            Self::EdgeMismatch { .. } => "RUNTIME_EDGE_MISMATCH",
            Self::EdgeLocked(_) => "RUNTIME_EDGE_LOCKED",
            Self::RoomNotLoaded(_) => "RUNTIME_ROOM_NOT_LOADED",
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::Graph(err) => err.error_code(),
            Self::Generation(err) => err.error_code(),
            Self::LockPoisoned => "RUNTIME_LOCK_POISONED",
            Self::MissingCollaborator(_) => "RUNTIME_MISSING_COLLABORATOR",
        }
    }
}
