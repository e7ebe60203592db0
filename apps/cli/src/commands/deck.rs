//! Commands working on saved deck snapshots.

use std::path::PathBuf;

use clap::Args;
use flashcard_core::{snapshot, Card, ExportFormat};
use tokio::io::BufReader;

use super::quiz::QuizRunner;
use crate::error::AppError;
use crate::state::AppState;

/// Arguments for `flashcards quiz`.
#[derive(Args, Debug)]
pub struct QuizArgs {
    /// JSON snapshot to study.
    pub snapshot: PathBuf,

    /// Directory quiz exports are written to.
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,
}

/// Arguments for `flashcards export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON snapshot to convert.
    pub snapshot: PathBuf,

    /// Output format (json/csv).
    #[arg(short = 'f', long, default_value = "csv", value_parser = parse_format)]
    pub format: ExportFormat,

    /// Output file (defaults to the format's standard file name).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `flashcards explain`.
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Question side of the card.
    #[arg(long)]
    pub front: String,

    /// Answer side of the card.
    #[arg(long)]
    pub back: String,

    /// Language of the explanation.
    #[arg(short = 'l', long)]
    pub language: Option<String>,
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_str(s).ok_or_else(|| format!("unknown format '{}'", s))
}

async fn load_snapshot(path: &PathBuf) -> Result<Vec<Card>, AppError> {
    let content = tokio::fs::read_to_string(path).await?;
    let cards = snapshot::from_json(&content)?;
    tracing::info!(cards = cards.len(), path = %path.display(), "Loaded snapshot");
    Ok(cards)
}

pub async fn quiz(args: QuizArgs, state: &mut AppState) -> Result<(), AppError> {
    let cards = load_snapshot(&args.snapshot).await?;
    state.session.load_deck(cards);
    state.session.start_quiz()?;

    let generator = state.generator(None)?;
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

pub async fn export(args: ExportArgs) -> Result<(), AppError> {
    let cards = load_snapshot(&args.snapshot).await?;
    let content = args.format.render(&cards)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.format.file_name()));

    tokio::fs::write(&output, content).await?;
    println!("Saved {} cards to {}", cards.len(), output.display());
    Ok(())
}

pub async fn explain(args: ExplainArgs, state: &AppState) -> Result<(), AppError> {
    let generator = state.generator(args.language.as_deref())?;
    let text = generator.explain(&Card::new(args.front, args.back)).await?;
    println!("{}", text.trim());
    Ok(())
}
