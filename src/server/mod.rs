//! HTTP server exposing the retrieval relay.
//!
//! A single chat endpoint accepts a conversation and streams the assistant
//! reply back as raw UTF-8 bytes, plus a health probe.

use crate::error::LecternError;
use crate::message::Message;
use crate::relay::RelayEngine;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
pub struct AppState {
    pub engine: RelayEngine,
}

/// Build the relay router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

/// Serve the relay on an already-bound listener until shutdown.
pub async fn run(listener: tokio::net::TcpListener, state: Arc<AppState>) -> anyhow::Result<()> {
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Relay a conversation to the completion provider and stream the reply.
///
/// Failures before the stream starts are classified: invalid conversations
/// get a 400, provider failures a 502, both with a JSON error body. Once
/// streaming has begun, a provider error terminates the response body in an
/// error state instead.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(conversation): Json<Vec<Message>>,
) -> Response {
    match state.engine.respond(&conversation).await {
        Ok(tokens) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            Body::from_stream(tokens),
        )
            .into_response(),
        Err(e @ LecternError::InvalidInput(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Relay request failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
