//! Deck snapshot import and export.
//!
//! The JSON snapshot is `{"flashcards": [{"frontText": ..., "backText": ...}]}`.
//! The CSV export targets flashcard apps that take a five-column layout.

use crate::error::SnapshotError;
use crate::parser::{cards_from_values, FLASHCARDS_KEY};
use crate::types::Card;
use serde::Serialize;
use serde_json::Value;

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "FrontText,BackText,Comment,FrontTextLanguage,BackTextLanguage";

/// Locale tag written to both language columns of the CSV export.
pub const CSV_LOCALE: &str = "ja-JP";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Default file name for exports in this format.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json => "flashcards.json",
            Self::Csv => "wordholic_cards.csv",
        }
    }

    /// MIME type of the rendered content.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv;charset=utf-8",
        }
    }

    /// Render `cards` in this format.
    pub fn render(&self, cards: &[Card]) -> Result<String, SnapshotError> {
        match self {
            Self::Json => to_json(cards),
            Self::Csv => Ok(to_csv(cards)),
        }
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    flashcards: &'a [Card],
}

/// Serialize cards as a pretty-printed JSON snapshot.
pub fn to_json(cards: &[Card]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(&SnapshotRef { flashcards: cards })?)
}

/// Read cards from a JSON snapshot.
///
/// Records without two non-blank string faces are skipped; a snapshot
/// without a `flashcards` array, or with no usable records, is rejected.
pub fn from_json(content: &str) -> Result<Vec<Card>, SnapshotError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| SnapshotError::Decode(e.to_string()))?;

    let items = value
        .get(FLASHCARDS_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SnapshotError::InvalidFormat(format!(
                "expected an object with a \"{}\" array",
                FLASHCARDS_KEY
            ))
        })?;

    let cards = cards_from_values(items);
    if cards.is_empty() {
        return Err(SnapshotError::Empty);
    }
    Ok(cards)
}

/// Render cards as CSV with quoted text columns.
pub fn to_csv(cards: &[Card]) -> String {
    let rows = cards
        .iter()
        .map(|card| {
            format!(
                "{},{},,{},{}",
                quote(&card.front_text),
                quote(&card.back_text),
                CSV_LOCALE,
                CSV_LOCALE
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}", CSV_HEADER, rows)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
