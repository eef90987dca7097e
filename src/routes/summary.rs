//! Summary Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/summary - Summarise to a target word count
//! - GET /api/v1/sessions/:id/summary - Most recent summary
//! - GET /api/v1/sessions/:id/summary/download - `summary_<name>.txt`

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{attachment, json_or_default, session_id};
use crate::ai::Summary;
use crate::error::{AppError, Result};
use crate::session::{SessionError, SummaryKey};
use crate::state::AppState;

pub const MIN_SUMMARY_WORDS: usize = 100;
pub const MAX_SUMMARY_WORDS: usize = 1000;
pub const SUMMARY_WORDS_STEP: usize = 50;
pub const DEFAULT_SUMMARY_WORDS: usize = 300;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryRequest {
    /// Target length in words
    pub length: usize,
    pub regenerate: bool,
}

impl Default for SummaryRequest {
    fn default() -> Self {
        Self {
            length: DEFAULT_SUMMARY_WORDS,
            regenerate: false,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: Summary,
    pub within_tolerance: bool,
    pub tolerance: f64,
    pub cached: bool,
}

impl SummaryResponse {
    fn new(summary: Summary, tolerance: f64, cached: bool) -> Self {
        Self {
            within_tolerance: summary.within_tolerance(tolerance),
            summary,
            tolerance,
            cached,
        }
    }
}

/// Create the summary router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/summary", post(generate).get(get_summary))
        .route("/:id/summary/download", get(download))
}

fn validate_length(length: usize) -> Result<()> {
    if !(MIN_SUMMARY_WORDS..=MAX_SUMMARY_WORDS).contains(&length) || length % SUMMARY_WORDS_STEP != 0 {
        return Err(AppError::BadRequest(format!(
            "length must be between {} and {} in steps of {}",
            MIN_SUMMARY_WORDS, MAX_SUMMARY_WORDS, SUMMARY_WORDS_STEP
        )));
    }
    Ok(())
}

/// POST /api/v1/sessions/:id/summary
async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SummaryResponse>> {
    let id = session_id(&id)?;
    let request: SummaryRequest = json_or_default(&body)?;
    validate_length(request.length)?;
    let tolerance = state.config().limits.summary_tolerance;

    let (identity, text) = state.sessions().document_text(id).await?;
    let key = SummaryKey {
        target_words: request.length,
        content_hash: identity.content_hash.clone(),
    };

    if !request.regenerate {
        let lookup = key.clone();
        let cached = state
            .sessions()
            .with_document(id, &identity, move |s| {
                let hit = s.summaries.get(&lookup).cloned();
                if hit.is_some() {
                    s.current_summary = Some(lookup);
                }
                Ok(hit)
            })
            .await?;
        if let Some(summary) = cached {
            return Ok(Json(SummaryResponse::new(summary, tolerance, true)));
        }
    }

    tracing::info!(session_id = %id, target_words = request.length, "Generating summary");
    let summary = state.generator().summary(&text, request.length).await?;

    if !summary.within_tolerance(tolerance) {
        tracing::warn!(
            session_id = %id,
            target_words = summary.target_word_count,
            actual_words = summary.actual_word_count,
            "Summary length outside tolerance"
        );
    }

    let stored = summary.clone();
    state
        .sessions()
        .with_document(id, &identity, move |s| {
            s.summaries.put(key.clone(), stored);
            s.current_summary = Some(key);
            Ok(())
        })
        .await?;

    Ok(Json(SummaryResponse::new(summary, tolerance, false)))
}

async fn current_summary(state: &AppState, id: &str) -> Result<(Summary, String)> {
    let id = session_id(id)?;
    let found = state
        .sessions()
        .with_session(id, |s| {
            let summary = s
                .current_summary()
                .cloned()
                .ok_or(SessionError::NotGenerated("summary"))?;
            let stem = s.document.as_ref().map(|d| d.stem().to_string()).unwrap_or_default();
            Ok((summary, stem))
        })
        .await?;
    Ok(found)
}

/// GET /api/v1/sessions/:id/summary
async fn get_summary(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SummaryResponse>> {
    let (summary, _) = current_summary(&state, &id).await?;
    let tolerance = state.config().limits.summary_tolerance;
    Ok(Json(SummaryResponse::new(summary, tolerance, true)))
}

/// GET /api/v1/sessions/:id/summary/download
async fn download(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let (summary, stem) = current_summary(&state, &id).await?;
    attachment(
        summary.summary,
        "text/plain; charset=utf-8",
        &format!("summary_{}.txt", stem),
    )
}
