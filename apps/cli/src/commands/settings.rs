//! `flashcards settings ...`

use clap::Subcommand;

use crate::error::AppError;
use crate::settings::Settings;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show the effective settings.
    Show,
    /// Store the provider API key.
    SetKey { key: String },
    /// Forget the stored API key.
    ClearKey,
    /// Use a different chat completion endpoint.
    SetEndpoint {
        url: String,
        /// The endpoint is a relay that adds the credential itself.
        #[arg(long)]
        relay: bool,
    },
    /// Use a different model.
    SetModel { model: String },
    /// Default language for cards and explanations.
    SetLanguage { language: String },
}

pub fn handle(cmd: SettingsCommand, state: &AppState) -> Result<(), AppError> {
    if let SettingsCommand::Show = cmd {
        show(&state.settings);
        return Ok(());
    }

    // Edit the stored file, not the environment-overridden view.
    let mut stored = Settings::load(&state.settings_path)?;
    apply(&mut stored, cmd);
    stored.save(&state.settings_path)?;
    println!("Saved {}", state.settings_path.display());
    Ok(())
}

fn apply(settings: &mut Settings, cmd: SettingsCommand) {
    match cmd {
        SettingsCommand::Show => {}
        SettingsCommand::SetKey { key } => settings.api_key = Some(key.trim().to_string()),
        SettingsCommand::ClearKey => settings.api_key = None,
        SettingsCommand::SetEndpoint { url, relay } => {
            settings.endpoint = url;
            settings.via_relay = relay;
        }
        SettingsCommand::SetModel { model } => settings.model = model,
        SettingsCommand::SetLanguage { language } => settings.language = language,
    }
}

fn show(settings: &Settings) {
    let key = settings
        .masked_api_key()
        .unwrap_or_else(|| "(not set)".to_string());
    println!("API key:  {}", key);
    println!("Endpoint: {}", settings.endpoint);
    println!("Relay:    {}", if settings.via_relay { "yes" } else { "no" });
    println!("Model:    {}", settings.model);
    println!("Language: {}", settings.language);
    if !settings.has_api_key() && !settings.via_relay {
        println!("\nNo API key yet. Run `flashcards settings set-key <KEY>` to add one.");
    }
}
