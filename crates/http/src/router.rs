//! HTTP transport adapter: classifies inbound requests by method and
//! bridges JSON-RPC POST bodies to the [`McpRouter`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use liupan_mcp::{INTERNAL_ERROR, McpRouter};

/// Largest request body the adapter will buffer.
const MAX_BODY_SIZE: usize = 1_048_576;

/// Shared state threaded through the axum handler.
#[derive(Clone)]
pub struct AppState {
    /// The JSON-RPC dispatcher.
    pub router: Arc<McpRouter>,
    /// Fixed public base URL for deployed content. When unset the adapter
    /// derives scheme and host from request headers.
    pub public_base_url: Option<String>,
}

/// Builds the axum `Router`. A fallback route is used so every path is
/// classified by HTTP method alone, matching the single-endpoint surface.
pub fn build_router(state: AppState) -> Router {
    Router::new().fallback(handle_request).with_state(state)
}

async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    if parts.method == Method::GET && wants_event_stream(&parts.headers) {
        return (StatusCode::METHOD_NOT_ALLOWED, "Not implemented").into_response();
    }

    if parts.method == Method::OPTIONS {
        return cors_preflight();
    }

    if parts.method == Method::POST {
        if !is_json(&parts.headers) {
            return (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type").into_response();
        }

        let bytes = match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
            Ok(bytes) => bytes,
            Err(error) => return internal_error(&error.to_string()),
        };
        let payload: Value = match serde_json::from_slice(&bytes) {
            Ok(payload) => payload,
            Err(error) => return internal_error(&error.to_string()),
        };

        let base_url = base_url(state.public_base_url.as_deref(), &parts.headers);
        let response = state.router.dispatch(&payload, &base_url).await;
        return Json(response).into_response();
    }

    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/event-stream"))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.contains("application/json"))
}

fn cors_preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, Authorization",
            ),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
        .into_response()
}

/// Fatal transport failure: malformed input or anything else escaping the
/// dispatch path. HTTP 500 carrying the fixed JSON-RPC server error.
fn internal_error(detail: &str) -> Response {
    tracing::error!(error = %detail, "request processing failed");
    let body = json!({
        "jsonrpc": "2.0",
        "id": null,
        "error": { "code": INTERNAL_ERROR, "message": "Internal server error" }
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Scheme+host deployed content is addressed under.
fn base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = configured {
        return url.trim_end_matches('/').to_string();
    }
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}
