//! Text-generation client for OpenAI-compatible chat completion endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default chat completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "google/gemma-2-9b-it";

/// Value sent as `HTTP-Referer`, identifying the app to the provider.
pub const APP_REFERER: &str = "https://github.com/jireh/flashcards";

/// Value sent as `X-Title`.
pub const APP_TITLE: &str = "flashcards";

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Remote error: {0}")]
    Remote(String),
}

/// A capability that turns a system instruction and a user query into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue one request and return the raw completion text.
    ///
    /// `expect_structured` asks the remote side to constrain its output to a
    /// single JSON object; it is a hint, not a guarantee.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        expect_structured: bool,
    ) -> Result<String, ClientError>;
}

/// Connection settings for [`ChatClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    /// The endpoint is a relay that injects the credential itself.
    pub via_relay: bool,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            via_relay: false,
            timeout: Duration::from_secs(120),
        }
    }
}

impl ClientConfig {
    /// Check that an endpoint and, unless going through a relay, a key are set.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.endpoint.trim().is_empty() {
            return Err(ClientError::Configuration(
                "no endpoint configured - run `flashcards settings set-endpoint <URL>`".to_string(),
            ));
        }
        if !self.via_relay && self.api_key().is_none() {
            return Err(ClientError::Configuration(
                "API key is not set - run `flashcards settings set-key <KEY>`".to_string(),
            ));
        }
        Ok(())
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

// === API Request Types ===

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Inner state shared across clones.
struct ChatClientInner {
    client: Client,
    config: ClientConfig,
}

/// Chat completion client.
///
/// Clone-able; all clones share one connection pool.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<ChatClientInner>,
}

impl ChatClient {
    /// Create a new client. Configuration is checked on each request, not here.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ChatClientInner { client, config }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        expect_structured: bool,
    ) -> Result<String, ClientError> {
        let config = &self.inner.config;
        config.validate()?;

        let request = ChatRequest {
            model: &config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: expect_structured.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(
            endpoint = %config.endpoint,
            model = %config.model,
            structured = expect_structured,
            "sending chat completion request"
        );

        let mut builder = self
            .inner
            .client
            .post(&config.endpoint)
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request);

        if !config.via_relay {
            if let Some(key) = config.api_key() {
                builder = builder.bearer_auth(key);
            }
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ClientError::Remote(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Remote(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), %message, "chat completion failed");
            return Err(ClientError::Remote(message));
        }

        extract_completion(&body)
    }
}

/// Pull the first choice's message content out of a response envelope.
fn extract_completion(body: &str) -> Result<String, ClientError> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| ClientError::Remote(format!("invalid response envelope: {}", e)))?;

    envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::Remote("response did not contain a completion".to_string()))
}

/// Best human-readable message for a failed response.
///
/// Tries `{error: {message}}`, `{message}`, `{error: "..."}`, then the raw
/// body, then a generic status message.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let structured = value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| value.get("message").and_then(Value::as_str))
            .or_else(|| value.get("error").and_then(Value::as_str));

        if let Some(message) = structured {
            return message.to_string();
        }
    }

    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    format!("HTTP error! status: {}", status)
}
