//! `flashcards generate`: documents in, deck out, then a quiz.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::Args;
use flashcard_core::types::DEFAULT_CARD_COUNT;
use flashcard_core::{snapshot, AnswerLength, Difficulty, GenerationRequest};
use tokio::io::BufReader;

use super::quiz::QuizRunner;
use crate::error::AppError;
use crate::extract::{extract_all, DocumentExtractor};
use crate::state::AppState;

/// Arguments for `flashcards generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source documents (.pdf, .txt or .md), read in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Number of cards to ask for.
    #[arg(short = 'n', long, default_value_t = DEFAULT_CARD_COUNT,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Question difficulty (easy/normal/hard).
    #[arg(long, value_parser = parse_difficulty)]
    pub difficulty: Option<Difficulty>,

    /// Answer length (short/normal/long).
    #[arg(long, value_parser = parse_length)]
    pub length: Option<AnswerLength>,

    /// Language the cards are written in.
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Fail unless the model returns exactly `--count` cards.
    #[arg(long)]
    pub strict_count: bool,

    /// Save the generated deck as a JSON snapshot.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Directory quiz exports are written to.
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Stop after generating instead of starting a quiz.
    #[arg(long)]
    pub no_quiz: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{}'", s))
}

fn parse_length(s: &str) -> Result<AnswerLength, String> {
    AnswerLength::from_str(s).ok_or_else(|| format!("unknown answer length '{}'", s))
}

pub async fn handle(args: GenerateArgs, state: &mut AppState) -> Result<(), AppError> {
    // Nothing is read or sent until a credential is configured.
    state.settings.client_config().validate()?;

    let source_text = extract_all(&DocumentExtractor, &args.files, |i, n, path| {
        eprintln!("Reading {} / {}: {}", i, n, path.display());
    })
    .await?;

    let count = NonZeroU32::new(args.count).unwrap_or(NonZeroU32::MIN);
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| state.settings.language.clone());
    let request = GenerationRequest::new(source_text, count)
        .with_difficulty(args.difficulty)
        .with_length(args.length)
        .with_language(language.clone());

    let generator = state
        .generator(Some(&language))?
        .with_strict_count(args.strict_count);

    let ticket = state.session.ticket();
    eprintln!("Generating {} flashcards...", count);
    let Some(cards) = generator.generate_deck(&request).await? else {
        return Ok(());
    };
    if !state.session.load_deck_for(ticket, cards) {
        tracing::warn!("session changed during generation, discarding result");
        return Ok(());
    }
    println!("Generated {} cards.", state.session.deck().len());

    if let Some(path) = &args.save {
        tokio::fs::write(path, snapshot::to_json(state.session.deck())?).await?;
        println!("Saved {}", path.display());
    }

    if args.no_quiz {
        return Ok(());
    }

    state.session.start_quiz()?;
    QuizRunner::new(
        &mut state.session,
        &generator,
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
        args.export_dir,
    )
    .run()
    .await
}
