//! Application state.

use std::path::PathBuf;

use flashcard_core::QuizSession;

use crate::client::ChatClient;
use crate::error::AppError;
use crate::pipeline::Generator;
use crate::settings::Settings;

/// State shared by the commands of one invocation.
pub struct AppState {
    /// Effective settings, environment overrides applied.
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub session: QuizSession,
}

impl AppState {
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            settings,
            settings_path,
            session: QuizSession::new(),
        }
    }

    /// Load settings from `settings_path` and apply environment overrides.
    pub fn load(settings_path: PathBuf) -> Result<Self, AppError> {
        let settings = Settings::load(&settings_path)?.with_env_overrides();
        Ok(Self::new(settings, settings_path))
    }

    /// A generator backed by the configured chat endpoint.
    ///
    /// Configuration is checked per request, so this succeeds even without
    /// an API key.
    pub fn generator(&self, language: Option<&str>) -> Result<Generator<ChatClient>, AppError> {
        let client = ChatClient::new(self.settings.client_config())?;
        let language = language.unwrap_or(&self.settings.language);
        Ok(Generator::new(client).with_language(language))
    }
}
