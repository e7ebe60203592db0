//! Terminal flashcard generator: documents in, LLM-written cards out, then a
//! self-graded quiz.

pub mod client;
pub mod commands;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod settings;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never mix with quiz output.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = commands::Cli::parse();
    commands::run(cli).await?;

    Ok(())
}
