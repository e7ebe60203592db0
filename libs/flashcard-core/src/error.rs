//! Error types for flashcard-core.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors that can occur while turning a model response into cards.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("response is not valid JSON: {0}")]
    Parse(String),

    #[error("unexpected response shape: {0}")]
    Schema(String),

    #[error("response contained no usable cards")]
    EmptyResult,

    #[error("expected {expected} cards but received {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Errors raised by quiz session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("there are no cards to study")]
    EmptyDeck,

    #[error("no quiz is in progress")]
    NotActive,

    #[error("an explanation for the current card is still loading")]
    ElaborationPending,
}

/// Errors that can occur while importing or exporting a deck snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not read snapshot: {0}")]
    Decode(String),

    #[error("invalid snapshot format: {0}")]
    InvalidFormat(String),

    #[error("snapshot contains no usable cards")]
    Empty,

    #[error("could not write snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
