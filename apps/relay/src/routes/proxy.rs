//! Pass-through forwarding to the model provider

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ALLOW, CONTENT_TYPE,
            ORIGIN,
        },
        HeaderMap, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

/// Methods the relay answers.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// POST /api/v1/chat/completions
/// Forwards the body with the relay's credential and returns the provider's
/// status, content type and body unmodified.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn forward(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    tracing::debug!(bytes = body.len(), "forwarding request");
    let upstream = state.upstream.forward(body, &headers).await?;
    tracing::info!(
        status = upstream.status.as_u16(),
        bytes = upstream.body.len(),
        "provider responded"
    );

    let mut response = (upstream.status, upstream.body).into_response();
    match upstream.content_type {
        Some(content_type) => {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        None => {
            response.headers_mut().remove(CONTENT_TYPE);
        }
    }
    Ok(response)
}

/// OPTIONS that is not a CORS preflight
/// Lists the supported methods.
pub async fn options() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(ALLOW, ALLOWED_METHODS), (ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
    )
}

fn is_preflight(headers: &HeaderMap) -> bool {
    headers.contains_key(ORIGIN) && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

/// Answers plain OPTIONS requests, leaving preflights to the CORS layer.
pub async fn plain_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS && !is_preflight(request.headers()) {
        return options().await.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_preflight_needs_origin_and_method() {
        let mut headers = HeaderMap::new();
        assert!(!is_preflight(&headers));

        headers.insert(ORIGIN, HeaderValue::from_static("https://example.com"));
        assert!(!is_preflight(&headers));

        headers.insert(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("POST"));
        assert!(is_preflight(&headers));
    }

    #[tokio::test]
    async fn test_options_lists_methods() {
        let response = options().await.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ALLOW], ALLOWED_METHODS);
    }
}
