//! Error types for vibe-cards-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while managing decks or driving a study session.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown deck list: {0}")]
    UnknownList(String),

    #[error("deck list already exists: {0}")]
    DuplicateList(String),

    #[error("invalid deck list name: {0:?}")]
    InvalidListName(String),

    #[error("cannot delete the last deck list")]
    LastList,

    #[error("card not found: {0}")]
    CardNotFound(i64),

    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("{0} mode is not available for this card")]
    ModeUnavailable(&'static str),

    #[error("current card was already answered")]
    AlreadyAnswered,

    #[error("card must be revealed before self-grading")]
    NotRevealed,

    #[error("deck list has no cards")]
    NoCards,

    #[error("index {index} out of range for deck of {len} cards")]
    OutOfRange { index: usize, len: usize },

    #[error("failed to persist deck lists: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Whether retrying the persist step can resolve this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
