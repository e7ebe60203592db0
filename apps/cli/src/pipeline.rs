//! Card generation and explanation pipeline.
//!
//! Source text -> prompt -> text generation -> validation -> cards.

use std::sync::atomic::{AtomicBool, Ordering};

use flashcard_core::types::DEFAULT_LANGUAGE;
use flashcard_core::{
    build_explanation_prompt, build_generation_prompt, parse_with, Card, GenerationRequest,
    ParseOptions,
};

use crate::client::{ClientError, TextGenerator};
use crate::error::AppError;

/// Message shown in place of an explanation that could not be generated.
pub const EXPLANATION_FAILED: &str = "Failed to generate an explanation.";

/// Runs generation requests through a [`TextGenerator`], one at a time.
pub struct Generator<G> {
    client: G,
    is_generating: AtomicBool,
    language: String,
    strict_count: bool,
}

/// Clears the in-flight flag when the generation call ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<G: TextGenerator> Generator<G> {
    pub fn new(client: G) -> Self {
        Self {
            client,
            is_generating: AtomicBool::new(false),
            language: DEFAULT_LANGUAGE.to_string(),
            strict_count: false,
        }
    }

    /// Language explanations are written in.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Require the model to return exactly the requested number of cards.
    pub fn with_strict_count(mut self, strict: bool) -> Self {
        self.strict_count = strict;
        self
    }

    pub fn client(&self) -> &G {
        &self.client
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating.load(Ordering::Acquire)
    }

    /// Generate a deck from the request's source text.
    ///
    /// Returns `Ok(None)` without doing anything if another generation is
    /// already in flight.
    pub async fn generate_deck(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<Vec<Card>>, AppError> {
        if request.source_text.trim().is_empty() {
            return Err(AppError::NoSourceText);
        }

        let Some(_in_flight) = InFlight::acquire(&self.is_generating) else {
            tracing::debug!("generation already in progress, ignoring trigger");
            return Ok(None);
        };

        let count = request.card_count.get();
        let prompt = build_generation_prompt(request);
        tracing::info!(
            cards = count,
            prompt_chars = prompt.user.chars().count(),
            "Requesting flashcards"
        );

        let raw = self
            .client
            .generate(&prompt.system, &prompt.user, true)
            .await?;

        let options = ParseOptions {
            expected_count: self.strict_count.then_some(count as usize),
        };
        let cards = parse_with(&raw, &options)?;

        tracing::info!(received = cards.len(), requested = count, "Generated flashcards");
        Ok(Some(cards))
    }

    /// Generate a markdown explanation for one card.
    pub async fn explain(&self, card: &Card) -> Result<String, ClientError> {
        let prompt = build_explanation_prompt(card, &self.language);
        self.client
            .generate(&prompt.system, &prompt.user, false)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CannedGenerator;
    use async_trait::async_trait;
    use flashcard_core::ValidationError;
    use pretty_assertions::assert_eq;
    use std::num::NonZeroU32;
    use tokio::sync::Notify;

    const SINGLE: &str = r#"{"flashcards":[{"frontText":"What is X?","backText":"Y"}]}"#;

    /// Holds every call open until released.
    struct BlockingGenerator {
        release: Notify,
    }

    #[async_trait]
    impl TextGenerator for BlockingGenerator {
        async fn generate(&self, _: &str, _: &str, _: bool) -> Result<String, ClientError> {
            self.release.notified().await;
            Ok(SINGLE.to_string())
        }
    }

    fn request(text: &str, count: u32) -> GenerationRequest {
        GenerationRequest::new(text, NonZeroU32::new(count).unwrap())
    }

    #[tokio::test]
    async fn test_generate_deck_validates_response() {
        let generator = Generator::new(CannedGenerator::ok(SINGLE));
        let cards = generator
            .generate_deck(&request("Some notes", 20))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cards, vec![Card::new("What is X?", "Y")]);

        let calls = generator.client().calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1, "generation must request structured output");
        assert!(calls[0].0.ends_with("Some notes"));
    }

    #[tokio::test]
    async fn test_fenced_response_is_accepted() {
        let fenced = format!("```json\n{}\n```", SINGLE);
        let generator = Generator::new(CannedGenerator::ok(&fenced));
        let cards = generator
            .generate_deck(&request("notes", 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_cards_yield_empty_result() {
        let generator = Generator::new(CannedGenerator::ok(
            r#"{"flashcards":[{"frontText":"","backText":"Y"}]}"#,
        ));
        let result = generator.generate_deck(&request("notes", 1)).await;
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::EmptyResult))
        ));
        assert!(!generator.is_generating());
    }

    #[tokio::test]
    async fn test_remote_failure_releases_gate() {
        let generator = Generator::new(CannedGenerator::failing("rate limited"));
        let result = generator.generate_deck(&request("notes", 1)).await;
        assert!(matches!(
            result,
            Err(AppError::Client(ClientError::Remote(ref m))) if m == "rate limited"
        ));
        assert!(!generator.is_generating());
    }

    #[tokio::test]
    async fn test_strict_count_mode() {
        let generator = Generator::new(CannedGenerator::ok(SINGLE)).with_strict_count(true);
        let result = generator.generate_deck(&request("notes", 3)).await;
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::CountMismatch {
                expected: 3,
                actual: 1
            }))
        ));
    }

    #[tokio::test]
    async fn test_empty_source_is_rejected_without_call() {
        let generator = Generator::new(CannedGenerator::ok(SINGLE));
        let result = generator.generate_deck(&request("  \n", 5)).await;
        assert!(matches!(result, Err(AppError::NoSourceText)));
        assert!(generator.client().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_trigger_while_generating_is_noop() {
        let generator = Generator::new(BlockingGenerator {
            release: Notify::new(),
        });
        let req = request("notes", 1);

        let (first, second) = tokio::join!(generator.generate_deck(&req), async {
            while !generator.is_generating() {
                tokio::task::yield_now().await;
            }
            let second = generator.generate_deck(&req).await;
            generator.client().release.notify_one();
            second
        });

        assert_eq!(first.unwrap().map(|cards| cards.len()), Some(1));
        assert!(matches!(second, Ok(None)));
        assert!(!generator.is_generating());
    }

    #[tokio::test]
    async fn test_explain_requests_free_text() {
        let generator =
            Generator::new(CannedGenerator::ok("## Conclusion\nY.")).with_language("English");
        let text = generator
            .explain(&Card::new("What is X?", "Y"))
            .await
            .unwrap();
        assert_eq!(text, "## Conclusion\nY.");

        let calls = generator.client().calls.lock().unwrap();
        assert!(!calls[0].1, "explanations are not structured output");
        assert!(calls[0].0.contains("Question: What is X?"));
    }
}
