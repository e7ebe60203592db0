//! Forwarding client for the model provider.

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use reqwest::Client;
use thiserror::Error;

use crate::config::RelayConfig;

/// Request headers passed through to the provider unchanged.
pub const FORWARDED_HEADERS: &[&str] = &["http-referer", "x-title"];

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to provider failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("provider did not respond within {0} seconds")]
    Timeout(u64),

    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// The provider's response, passed back to the caller as-is.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Sends request bodies to the provider with the relay's credential.
pub struct UpstreamClient {
    client: Client,
    url: String,
    api_key: String,
    timeout_secs: u64,
}

impl UpstreamClient {
    pub fn new(config: &RelayConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.provider_url.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.upstream_timeout.as_secs(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forward `body` to the provider.
    ///
    /// Any `Authorization` header on the incoming request is replaced by the
    /// relay's own credential. Non-success statuses are not errors here; the
    /// caller gets the provider's answer whatever it is.
    pub async fn forward(
        &self,
        body: Bytes,
        headers: &HeaderMap,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));

        let mut request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, content_type)
            .body(body);

        for name in FORWARDED_HEADERS {
            if let Some(value) = headers.get(*name) {
                request = request.header(*name, value.clone());
            }
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::Request(error)
        }
    }
}
