//! Core flashcard library: pure logic behind the `flashcards` CLI.
//!
//! Provides:
//! - Prompt construction for card generation and per-card explanations
//! - Validation of model responses into decks of cards
//! - The quiz session state machine (shuffle, flip, score, finish)
//! - Deck snapshot import/export (JSON and CSV)
//! - Shared types (Card, GenerationRequest, Difficulty, etc.)

pub mod error;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod shuffle;
pub mod snapshot;
pub mod types;

pub use error::{Result, SessionError, SnapshotError, ValidationError};
pub use parser::{parse, parse_with, ParseOptions};
pub use prompt::{build_explanation_prompt, build_generation_prompt, Prompt};
pub use session::{Phase, Progress, QuizSession, QuizSummary, Ticket};
pub use snapshot::ExportFormat;
pub use types::{AnswerLength, Card, Deck, Difficulty, GenerationRequest};
