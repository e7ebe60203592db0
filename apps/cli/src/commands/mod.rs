//! Command-line interface wiring for the `flashcards` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::AppError;
use crate::settings::Settings;
use crate::state::AppState;

pub mod deck;
pub mod generate;
pub mod quiz;
pub mod settings;

pub use quiz::QuizRunner;

/// Parsed CLI entrypoint for the `flashcards` binary.
#[derive(Parser, Debug)]
#[command(
    name = "flashcards",
    version,
    about = "Generate study flashcards from documents and quiz yourself"
)]
pub struct Cli {
    /// Settings file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a deck from documents, then quiz on it.
    Generate(generate::GenerateArgs),
    /// Quiz on a previously saved deck.
    Quiz(deck::QuizArgs),
    /// Convert a saved deck to JSON or CSV.
    Export(deck::ExportArgs),
    /// Explain a single question and answer.
    Explain(deck::ExplainArgs),
    /// Show or change settings.
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

/// Execute the requested command.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let settings_path = cli.settings.unwrap_or_else(Settings::default_path);
    let mut state = AppState::load(settings_path)?;

    match cli.command {
        Command::Generate(args) => generate::handle(args, &mut state).await,
        Command::Quiz(args) => deck::quiz(args, &mut state).await,
        Command::Export(args) => deck::export(args).await,
        Command::Explain(args) => deck::explain(args, &state).await,
        Command::Settings(cmd) => settings::handle(cmd, &state),
    }
}
