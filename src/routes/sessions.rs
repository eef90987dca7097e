//! Session Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions - Start a study session
//! - GET /api/v1/sessions/:id - Session status and cached artifacts
//! - DELETE /api/v1/sessions/:id - End a session
//!
//! Document, analysis and artifact routes are merged in from their modules.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::{analysis, documents, flashcards, mindmap, quiz, session_id, summary};
use crate::error::Result;
use crate::session::SessionInfo;
use crate::state::AppState;

/// Create the sessions router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .merge(documents::router(max_upload_bytes))
        .merge(analysis::router())
        .merge(mindmap::router())
        .merge(summary::router())
        .merge(flashcards::router())
        .merge(quiz::router())
}

/// POST /api/v1/sessions
async fn create_session(State(state): State<AppState>) -> Result<(StatusCode, Json<SessionInfo>)> {
    let info = state.sessions().create().await?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// GET /api/v1/sessions/:id
async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SessionInfo>> {
    let id = session_id(&id)?;
    Ok(Json(state.sessions().info(id).await?))
}

/// DELETE /api/v1/sessions/:id
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let id = session_id(&id)?;
    state.sessions().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
