//! Quiz Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/quiz - Generate a quiz
//! - GET /api/v1/sessions/:id/quiz - Current question and progress
//! - PUT /api/v1/sessions/:id/quiz/answers/:index - Answer question `index` (0-based)
//! - POST /api/v1/sessions/:id/quiz/navigate - Move to a question
//! - POST /api/v1/sessions/:id/quiz/submit - Grade the quiz
//! - GET /api/v1/sessions/:id/quiz/results - Graded results
//! - POST /api/v1/sessions/:id/quiz/retake - Clear answers and start over
//!
//! Correct answers are never exposed before submission.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{json_or_default, session_id};
use crate::ai::{Choice, Difficulty};
use crate::error::{AppError, Result};
use crate::session::{QuizArtifact, SessionError, StudySession};
use crate::state::AppState;
use crate::study::{QuizResults, QuizSession, QuizView, StudyError};

pub const MIN_QUIZ_QUESTIONS: usize = 5;
pub const MAX_QUIZ_QUESTIONS: usize = 20;
pub const DEFAULT_QUIZ_QUESTIONS: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizRequest {
    pub count: usize,
    pub difficulty: Difficulty,
    pub regenerate: bool,
}

impl Default for QuizRequest {
    fn default() -> Self {
        Self {
            count: DEFAULT_QUIZ_QUESTIONS,
            difficulty: Difficulty::default(),
            regenerate: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Next,
    Previous,
}

/// Navigation target: a 0-based question index or a relative step
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum NavigateTarget {
    Index(usize),
    Step(Step),
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub to: NavigateTarget,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub requested: usize,
    pub difficulty: Difficulty,
    #[serde(flatten)]
    pub view: QuizView,
    pub cached: bool,
}

impl QuizResponse {
    fn new(artifact: &QuizArtifact, cached: bool) -> Self {
        Self {
            requested: artifact.requested,
            difficulty: artifact.difficulty,
            view: artifact.quiz.view(),
            cached,
        }
    }
}

/// Create the quiz router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/quiz", post(generate).get(get_quiz))
        .route("/:id/quiz/answers/:index", put(answer))
        .route("/:id/quiz/navigate", post(navigate))
        .route("/:id/quiz/submit", post(submit))
        .route("/:id/quiz/results", get(results))
        .route("/:id/quiz/retake", post(retake))
}

fn quiz_mut(session: &mut StudySession) -> std::result::Result<&mut QuizSession, SessionError> {
    session
        .quiz
        .as_mut()
        .map(|a| &mut a.quiz)
        .ok_or(SessionError::NotGenerated("quiz"))
}

/// Run a state transition on the session's quiz
async fn with_quiz<R>(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut QuizSession) -> std::result::Result<R, StudyError>,
) -> Result<R> {
    let id = session_id(id)?;
    let outcome = state
        .sessions()
        .with_session(id, |s| Ok(f(quiz_mut(s)?)))
        .await??;
    Ok(outcome)
}

/// POST /api/v1/sessions/:id/quiz
async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<QuizResponse>> {
    let id = session_id(&id)?;
    let request: QuizRequest = json_or_default(&body)?;
    if !(MIN_QUIZ_QUESTIONS..=MAX_QUIZ_QUESTIONS).contains(&request.count) {
        return Err(AppError::BadRequest(format!(
            "count must be between {} and {}",
            MIN_QUIZ_QUESTIONS, MAX_QUIZ_QUESTIONS
        )));
    }

    let (identity, text) = state.sessions().document_text(id).await?;

    if !request.regenerate {
        let cached = state
            .sessions()
            .with_document(id, &identity, |s| {
                Ok(s.quiz
                    .as_ref()
                    .filter(|a| a.requested == request.count && a.difficulty == request.difficulty)
                    .map(|a| QuizResponse::new(a, true)))
            })
            .await?;
        if let Some(response) = cached {
            return Ok(Json(response));
        }
    }

    let questions = state
        .generator()
        .quiz(&text, request.count, request.difficulty)
        .await?;
    tracing::info!(
        session_id = %id,
        requested = request.count,
        generated = questions.len(),
        difficulty = request.difficulty.as_str(),
        "Generated quiz"
    );

    let artifact = QuizArtifact {
        requested: request.count,
        difficulty: request.difficulty,
        quiz: QuizSession::new(questions),
    };
    let response = QuizResponse::new(&artifact, false);
    state
        .sessions()
        .with_document(id, &identity, move |s| {
            s.quiz = Some(artifact);
            Ok(())
        })
        .await?;

    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/quiz
async fn get_quiz(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<QuizResponse>> {
    let id = session_id(&id)?;
    let response = state
        .sessions()
        .with_session(id, |s| {
            s.quiz
                .as_ref()
                .map(|a| QuizResponse::new(a, true))
                .ok_or(SessionError::NotGenerated("quiz"))
        })
        .await?;
    Ok(Json(response))
}

/// PUT /api/v1/sessions/:id/quiz/answers/:index
async fn answer(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<QuizView>> {
    let index: usize = index
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid question index '{}'", index)))?;
    let request: AnswerRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid answer: {}", e)))?;
    let choice: Choice = request.answer.parse().map_err(AppError::BadRequest)?;

    let view = with_quiz(&state, &id, |quiz| {
        quiz.answer(index, choice)?;
        Ok(quiz.view())
    })
    .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/quiz/navigate
async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<QuizView>> {
    let request: NavigateRequest = serde_json::from_slice(&body).map_err(|e| {
        AppError::BadRequest(format!("Invalid navigation target (index, \"next\" or \"previous\"): {}", e))
    })?;

    let view = with_quiz(&state, &id, |quiz| {
        match request.to {
            NavigateTarget::Index(index) => quiz.goto(index)?,
            NavigateTarget::Step(Step::Next) => quiz.next(),
            NavigateTarget::Step(Step::Previous) => quiz.previous(),
        }
        Ok(quiz.view())
    })
    .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/quiz/submit
async fn submit(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<QuizResults>> {
    let results = with_quiz(&state, &id, |quiz| quiz.submit()).await?;
    tracing::info!(
        session_id = %id,
        score = results.score,
        total = results.total,
        "Quiz submitted"
    );
    Ok(Json(results))
}

/// GET /api/v1/sessions/:id/quiz/results
async fn results(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<QuizResults>> {
    let results = with_quiz(&state, &id, |quiz| quiz.results()).await?;
    Ok(Json(results))
}

/// POST /api/v1/sessions/:id/quiz/retake
async fn retake(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<QuizView>> {
    let view = with_quiz(&state, &id, |quiz| {
        quiz.retake();
        Ok(quiz.view())
    })
    .await?;
    Ok(Json(view))
}
