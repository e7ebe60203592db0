//! Core types for flashcard generation and review.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Number of cards requested when the user does not pick a count.
pub const DEFAULT_CARD_COUNT: u32 = 20;

/// Maximum number of source characters embedded in a generation request.
pub const MAX_SOURCE_CHARS: usize = 15_000;

/// Language cards and explanations are written in unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "Japanese";

/// A single flashcard: a question on the front, its answer on the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub front_text: String,
    pub back_text: String,
}

impl Card {
    pub fn new(front_text: impl Into<String>, back_text: impl Into<String>) -> Self {
        Self {
            front_text: front_text.into(),
            back_text: back_text.into(),
        }
    }

    /// Whether both faces carry non-blank text.
    pub fn is_usable(&self) -> bool {
        !self.front_text.trim().is_empty() && !self.back_text.trim().is_empty()
    }
}

/// Ordered cards driving one quiz session.
pub type Deck = Vec<Card>;

/// Difficulty of generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Get the difficulty name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Length of generated answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerLength {
    Short,
    #[default]
    Normal,
    Long,
}

impl AnswerLength {
    /// Get the length name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Normal => "normal",
            Self::Long => "long",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Self::Short),
            "normal" => Some(Self::Normal),
            "long" => Some(Self::Long),
            _ => None,
        }
    }
}

/// Parameters for one card generation request.
///
/// The options only change the instructions sent to the model; the client
/// and validator behave the same regardless of their values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub card_count: NonZeroU32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<AnswerLength>,
    pub language: String,
    pub source_text: String,
}

impl GenerationRequest {
    /// Create a request with the given source text and count, other options unset.
    pub fn new(source_text: impl Into<String>, card_count: NonZeroU32) -> Self {
        Self {
            card_count,
            difficulty: None,
            length: None,
            language: DEFAULT_LANGUAGE.to_string(),
            source_text: source_text.into(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_length(mut self, length: Option<AnswerLength>) -> Self {
        self.length = length;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
