use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{self, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use code_core::{CodeHandler, HttpMethod, HttpRequest, HttpResponse};
use tokio::net::TcpListener;
use tracing::debug;

pub mod config;
pub mod memory;
pub mod telemetry;

pub use config::{ServerConfig, ServerError};
pub use memory::MemoryLoader;
pub use telemetry::{TracingAuditLogger, TracingErrorReporter};

#[derive(Clone, Debug)]
pub struct AppState {
    pub handler: Arc<CodeHandler>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(handler: CodeHandler, max_body_bytes: usize) -> Self {
        Self {
            handler: Arc::new(handler),
            max_body_bytes,
        }
    }
}

/// Handler wired from a server config: in-memory codes, tracing reporter and
/// tracing audit log.
pub fn build_handler(config: &ServerConfig) -> CodeHandler {
    CodeHandler::builder()
        .loader(MemoryLoader::new(config.codes.clone()))
        .config(&config.handler)
        .error_reporter(TracingErrorReporter)
        .audit_logger(TracingAuditLogger)
        .build()
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/codes", any(load_codes))
        .route("/codes/{*master}", any(load_codes))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    let state = AppState::new(build_handler(config), config.max_body_bytes);
    axum::serve(listener, app(state)).await
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn load_codes(State(state): State<AppState>, request: Request) -> Response {
    let request = into_request(request, state.max_body_bytes).await;
    into_response(state.handler.load(&request).await)
}

/// Collect an axum request into plain data. A body that cannot be collected
/// within `limit` bytes becomes `None`.
pub async fn into_request(request: Request, limit: usize) -> HttpRequest {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            debug!(path = %parts.uri.path(), "request body unreadable: {err}");
            None
        }
    };
    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    HttpRequest {
        method: HttpMethod::from(parts.method.as_str()),
        path: parts.uri.path().to_string(),
        headers,
        body,
    }
}

pub fn into_response(response: HttpResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = http::Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
