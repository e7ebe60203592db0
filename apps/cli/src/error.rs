//! Application error type.
//!
//! Every failure of a user action ends up here and is shown as one message.

use thiserror::Error;

use crate::client::ClientError;
use crate::extract::ExtractionError;
use crate::settings::SettingsError;
use flashcard_core::{SessionError, SnapshotError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("could not understand the model response: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to process document: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("failed to load deck: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("no source text loaded")]
    NoSourceText,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let error = AppError::from(ClientError::Remote("rate limited".to_string()));
        assert_eq!(error.to_string(), "Remote error: rate limited");
    }

    #[test]
    fn test_validation_error_display() {
        let error = AppError::from(ValidationError::EmptyResult);
        assert_eq!(
            error.to_string(),
            "could not understand the model response: response contained no usable cards"
        );
    }

    #[test]
    fn test_session_error_display() {
        let error = AppError::from(SessionError::EmptyDeck);
        assert_eq!(error.to_string(), "there are no cards to study");
    }
}
