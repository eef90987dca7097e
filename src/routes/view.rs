//! Dashboard page
//!
//! - GET /sessions/:id - Server-rendered overview of everything cached in a session

use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};

use super::session_id;
use crate::error::Result;
use crate::render::{dashboard_page, DashboardView};
use crate::state::AppState;

/// Create the dashboard router
pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(dashboard))
}

/// GET /sessions/:id
async fn dashboard(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>> {
    let id = session_id(&id)?;

    let view = state
        .sessions()
        .with_session(id, |s| {
            let summary = s.current_summary().cloned();
            let quiz_results = s.quiz.as_ref().and_then(|a| a.quiz.results().ok());
            Ok(DashboardView {
                document: s.document.as_ref().map(|d| d.info()),
                analysis: s.analysis.clone(),
                mindmap: s.mindmap.clone(),
                summary,
                flashcard: s.flashcards.as_ref().map(|a| a.deck.view()),
                quiz: s.quiz.as_ref().map(|a| a.quiz.view()),
                quiz_results,
            })
        })
        .await?;

    // Rendering happens outside the session lock
    Ok(Html(dashboard_page(&view)?))
}
