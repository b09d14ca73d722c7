//! Error types for adventures and the game engine.

use thiserror::Error;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that abort a story operation.
///
/// Expected play conditions (an out-of-range choice, an unmet requirement)
/// are outcomes, not errors; see [`NodeOutcome`](crate::engine::NodeOutcome).
#[derive(Debug, Error)]
pub enum StoryError {
    /// A node id referenced by the adventure does not exist.
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    /// Two nodes in an adventure file share an id.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    /// A node in an adventure file is malformed.
    #[error("node '{id}': {reason}")]
    InvalidNode {
        /// The node id.
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Dice or stat block error.
    #[error("{0}")]
    Mechanics(#[from] gb_mechanics::MechError),

    /// JSON (de)serialization error.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
