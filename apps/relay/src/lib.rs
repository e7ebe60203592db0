pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::RelayConfig;
use crate::services::upstream::{UpstreamClient, UpstreamError};

/// Path the provider serves chat completions on; the relay mirrors it.
pub const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            upstream: Arc::new(UpstreamClient::new(config)?),
        })
    }
}

/// Permissive CORS that echoes whatever methods and headers a preflight asks for.
fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(86_400))
}

/// Build the relay router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", post(routes::proxy::forward))
        .route(COMPLETIONS_PATH, post(routes::proxy::forward))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Plain OPTIONS must be answered before the CORS layer
                // treats it as a preflight.
                .layer(middleware::from_fn(routes::proxy::plain_options))
                .layer(cors_layer()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env()?;
    let state = AppState::new(&config)?;
    let app = app(state);

    let addr = config.addr();
    tracing::info!("Forwarding to {}", config.provider_url);
    tracing::info!("Starting relay on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
