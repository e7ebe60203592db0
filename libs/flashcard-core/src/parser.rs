//! Validator turning raw model output into cards.
//!
//! # Format
//! ```json
//! {"flashcards": [{"frontText": "What is Rust?", "backText": "A systems language."}]}
//! ```
//!
//! The payload may be wrapped in a markdown code fence (`` ```json ... ``` ``);
//! that wrapping is removed before decoding. No other decoration is tolerated.

use crate::error::{Result, ValidationError};
use crate::types::Card;
use serde_json::Value;

/// Key holding the card array in responses and snapshots.
pub const FLASHCARDS_KEY: &str = "flashcards";

/// Optional stricter checks applied after validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Reject the result unless exactly this many usable cards were returned.
    pub expected_count: Option<usize>,
}

/// Parse a model response into cards, preserving response order.
pub fn parse(raw: &str) -> Result<Vec<Card>> {
    parse_with(raw, &ParseOptions::default())
}

/// Parse a model response into cards, applying the given options.
pub fn parse_with(raw: &str, options: &ParseOptions) -> Result<Vec<Card>> {
    let payload = strip_code_fence(raw);

    let value: Value =
        serde_json::from_str(payload).map_err(|e| ValidationError::Parse(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::Schema("top-level value is not an object".to_string()))?;

    let items = object
        .get(FLASHCARDS_KEY)
        .ok_or_else(|| ValidationError::Schema(format!("missing \"{}\" field", FLASHCARDS_KEY)))?
        .as_array()
        .ok_or_else(|| ValidationError::Schema(format!("\"{}\" is not an array", FLASHCARDS_KEY)))?;

    let cards = cards_from_values(items);
    if cards.is_empty() {
        return Err(ValidationError::EmptyResult);
    }

    if let Some(expected) = options.expected_count {
        if cards.len() != expected {
            return Err(ValidationError::CountMismatch {
                expected,
                actual: cards.len(),
            });
        }
    }

    Ok(cards)
}

/// Keep every element that carries non-blank `frontText` and `backText` strings.
pub(crate) fn cards_from_values(items: &[Value]) -> Vec<Card> {
    items.iter().filter_map(card_from_value).collect()
}

fn card_from_value(item: &Value) -> Option<Card> {
    let front = item.get("frontText")?.as_str()?.trim();
    let back = item.get("backText")?.as_str()?.trim();

    if front.is_empty() || back.is_empty() {
        return None;
    }

    Some(Card::new(front, back))
}

/// Remove a surrounding markdown code fence, including its info string.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string ("json") on the opening fence line. A single-line
    // block has its info string as a leading word before the payload.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
            .trim_start(),
    };

    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SINGLE: &str = r#"{"flashcards":[{"frontText":"What is X?","backText":"Y"}]}"#;

    #[test]
    fn parse_single_card() {
        let cards = parse(SINGLE).unwrap();
        assert_eq!(cards, vec![Card::new("What is X?", "Y")]);
    }

    #[test]
    fn parse_fenced_block_matches_plain() {
        let fenced = format!("```json\n{}\n```", SINGLE);
        assert_eq!(parse(&fenced).unwrap(), parse(SINGLE).unwrap());

        let bare_fence = format!("```\n{}\n```\n", SINGLE);
        assert_eq!(parse(&bare_fence).unwrap(), parse(SINGLE).unwrap());

        let one_line = format!("```json {}```", SINGLE);
        assert_eq!(parse(&one_line).unwrap(), parse(SINGLE).unwrap());

        let one_line_bare = format!("```{}```", SINGLE);
        assert_eq!(parse(&one_line_bare).unwrap(), parse(SINGLE).unwrap());
    }

    #[test]
    fn reject_other_decoration() {
        let chatty = format!("Here are your cards:\n{}", SINGLE);
        assert!(matches!(parse(&chatty), Err(ValidationError::Parse(_))));
    }

    #[test]
    fn blank_front_yields_empty_result() {
        let raw = r#"{"flashcards":[{"frontText":"","backText":"Y"}]}"#;
        assert!(matches!(parse(raw), Err(ValidationError::EmptyResult)));
    }

    #[test]
    fn filters_malformed_elements_and_keeps_order() {
        let raw = r#"{"flashcards":[
            {"frontText":"Q1","backText":"A1"},
            {"frontText":"   ","backText":"A2"},
            {"frontText":"Q3"},
            {"frontText":3,"backText":"A4"},
            "not a card",
            {"frontText":" Q6 ","backText":" A6 "}
        ]}"#;
        let cards = parse(raw).unwrap();
        assert_eq!(cards, vec![Card::new("Q1", "A1"), Card::new("Q6", "A6")]);
        assert!(cards.iter().all(Card::is_usable));
    }

    #[test]
    fn reject_invalid_json() {
        assert!(matches!(parse("{not json"), Err(ValidationError::Parse(_))));
        assert!(matches!(parse(""), Err(ValidationError::Parse(_))));
    }

    #[test]
    fn reject_missing_or_wrong_key() {
        assert!(matches!(
            parse(r#"{"cards":[]}"#),
            Err(ValidationError::Schema(_))
        ));
        assert!(matches!(
            parse(r#"{"flashcards":{"frontText":"Q","backText":"A"}}"#),
            Err(ValidationError::Schema(_))
        ));
        assert!(matches!(parse("[]"), Err(ValidationError::Schema(_))));
    }

    #[test]
    fn empty_array_is_empty_result() {
        assert!(matches!(
            parse(r#"{"flashcards":[]}"#),
            Err(ValidationError::EmptyResult)
        ));
    }

    #[test]
    fn strict_count_rejects_mismatch() {
        let options = ParseOptions {
            expected_count: Some(2),
        };
        let result = parse_with(SINGLE, &options);
        assert!(matches!(
            result,
            Err(ValidationError::CountMismatch {
                expected: 2,
                actual: 1
            })
        ));

        let options = ParseOptions {
            expected_count: Some(1),
        };
        assert_eq!(parse_with(SINGLE, &options).unwrap().len(), 1);
    }

    #[test]
    fn lenient_count_accepts_fewer_cards() {
        assert_eq!(parse(SINGLE).unwrap().len(), 1);
    }
}
