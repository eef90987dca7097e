//! Analysis Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/analysis - Analyse the loaded document (cached)
//! - GET /api/v1/sessions/:id/analysis - Cached analysis

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use super::session_id;
use crate::error::Result;
use crate::session::{AnalysisArtifact, DocumentIdentity, SessionError};
use crate::state::AppState;

/// Create the analysis router
pub fn router() -> Router<AppState> {
    Router::new().route("/:id/analysis", post(analyze).get(get_analysis))
}

/// Cached analysis of the session's document, computing it on first use
///
/// Returns the document snapshot alongside so callers can reuse it.
pub(crate) async fn ensure_analysis(
    state: &AppState,
    id: uuid::Uuid,
) -> Result<(DocumentIdentity, Arc<str>, AnalysisArtifact)> {
    let (identity, text) = state.sessions().document_text(id).await?;

    let cached = state
        .sessions()
        .with_document(id, &identity, |s| Ok(s.analysis.clone()))
        .await?;
    if let Some(analysis) = cached {
        return Ok((identity, text, analysis));
    }

    let analysis_text = text.clone();
    let artifact = tokio::task::spawn_blocking(move || AnalysisArtifact::compute(&analysis_text))
        .await
        .map_err(|e| crate::error::AppError::Internal(format!("analysis task failed: {}", e)))?;

    tracing::info!(
        session_id = %id,
        words = artifact.analysis.word_count,
        complexity = artifact.analysis.complexity_score,
        detail_level = artifact.recommended.detail_level.as_str(),
        "Analysed document"
    );

    let stored = artifact.clone();
    state
        .sessions()
        .with_document(id, &identity, move |s| {
            s.analysis = Some(stored);
            Ok(())
        })
        .await?;

    Ok((identity, text, artifact))
}

/// POST /api/v1/sessions/:id/analysis
async fn analyze(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AnalysisArtifact>> {
    let id = session_id(&id)?;
    let (_, _, artifact) = ensure_analysis(&state, id).await?;
    Ok(Json(artifact))
}

/// GET /api/v1/sessions/:id/analysis
async fn get_analysis(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AnalysisArtifact>> {
    let id = session_id(&id)?;
    let artifact = state
        .sessions()
        .with_session(id, |s| s.analysis.clone().ok_or(SessionError::NotGenerated("analysis")))
        .await?;
    Ok(Json(artifact))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};

    use crate::ai::MockProvider;
    use crate::routes::testing::{app_with, json, session_with_document};

    #[tokio::test]
    async fn test_analysis_is_cached() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = session_with_document(&app).await;
        let uri = format!("/api/v1/sessions/{}/analysis", id);

        let (status, _) = json(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = json(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["analysis"]["wordCount"].as_u64().unwrap() > 0);
        assert_eq!(body["recommended"]["detailLevel"], "basic");

        let (status, cached) = json(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cached, body);
    }
}
