//! Common test utilities for relay integration tests.
//!
//! Each [`TestContext`] starts a fake provider on a loopback port and a relay
//! router pointed at it. The provider records every request it receives.

pub mod fixtures;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};

use flashcards_relay::config::RelayConfig;
use flashcards_relay::{AppState, COMPLETIONS_PATH};

/// A request as the fake provider saw it.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone)]
struct ProviderState {
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    status: StatusCode,
    body: &'static str,
}

async fn record(
    State(state): State<ProviderState>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state
        .received
        .lock()
        .unwrap()
        .push(ReceivedRequest { headers, body });
    (
        state.status,
        [(CONTENT_TYPE, "application/json")],
        state.body,
    )
}

/// Relay router wired to a fake provider.
pub struct TestContext {
    pub provider_url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    app: Router,
}

impl TestContext {
    /// Fake provider that answers every request with `status` and `body`.
    pub async fn new(status: StatusCode, body: &'static str) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let provider = Router::new()
            .route(COMPLETIONS_PATH, post(record))
            .with_state(ProviderState {
                received: received.clone(),
                status,
                body,
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, provider).await.unwrap();
        });

        let provider_url = format!("http://{}{}", addr, COMPLETIONS_PATH);
        let app = Self::relay(&provider_url);

        Self {
            provider_url,
            received,
            app,
        }
    }

    /// Relay pointed at `provider_url`, which need not be listening.
    pub fn relay(provider_url: &str) -> Router {
        let config = RelayConfig {
            api_key: fixtures::TEST_API_KEY.to_string(),
            provider_url: provider_url.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            upstream_timeout: Duration::from_secs(5),
        };
        let state = AppState::new(&config).expect("Failed to build relay state");
        flashcards_relay::app(state)
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Requests the fake provider has received so far.
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}
