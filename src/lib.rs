//! VeloStudy
//!
//! A study companion server: upload a PDF, then get an AI-generated summary,
//! flashcards, a quiz and an interactive mindmap, all cached per session.

pub mod ai;
pub mod analysis;
pub mod config;
pub mod error;
pub mod pdf;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
pub mod study;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
///
/// CORS is left to the binary so tests and embedders can choose their own.
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config().limits.max_upload_bytes();

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/health", get(routes::health::health_check))
        .nest("/api/v1/sessions", routes::sessions::router(max_upload_bytes))
        .nest("/sessions", routes::view::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
