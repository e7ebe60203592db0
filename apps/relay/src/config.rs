//! Relay configuration from environment variables.

use std::time::Duration;

use thiserror::Error;

/// Provider endpoint used when `PROVIDER_URL` is unset.
pub const DEFAULT_PROVIDER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub provider_url: String,
    pub host: String,
    pub port: u16,
    pub upstream_timeout: Duration,
}

impl RelayConfig {
    /// Read the configuration from the process environment.
    ///
    /// Env vars:
    /// - PROVIDER_API_KEY: credential injected into forwarded requests (required)
    /// - PROVIDER_URL: chat completion endpoint to forward to
    /// - HOST / PORT: listen address (default 0.0.0.0:8787)
    /// - UPSTREAM_TIMEOUT_SECS: provider timeout (default 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("PROVIDER_API_KEY").ok_or(ConfigError::Missing("PROVIDER_API_KEY"))?;
        let provider_url =
            var("PROVIDER_URL").unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string());
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match var("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => 8787,
        };

        let timeout_secs: u64 = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                value,
            })?,
            None => 120,
        };

        Ok(Self {
            api_key,
            provider_url,
            host,
            port,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
