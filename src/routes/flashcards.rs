//! Flashcard Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/flashcards - Generate a deck
//! - GET /api/v1/sessions/:id/flashcards - Current deck
//! - POST /api/v1/sessions/:id/flashcards/actions - flip | next | previous | correct | incorrect

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{json_or_default, session_id};
use crate::ai::Flashcard;
use crate::error::{AppError, Result};
use crate::session::{DeckArtifact, SessionError};
use crate::state::AppState;
use crate::study::{DeckAction, DeckView, FlashcardDeck};

pub const MIN_FLASHCARDS: usize = 5;
pub const MAX_FLASHCARDS: usize = 25;
pub const DEFAULT_FLASHCARDS: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlashcardsRequest {
    pub count: usize,
    pub regenerate: bool,
}

impl Default for FlashcardsRequest {
    fn default() -> Self {
        Self {
            count: DEFAULT_FLASHCARDS,
            regenerate: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: DeckAction,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckResponse {
    pub requested: usize,
    pub cards: Vec<Flashcard>,
    pub deck: DeckView,
    pub cached: bool,
}

impl DeckResponse {
    fn new(artifact: &DeckArtifact, cached: bool) -> Self {
        Self {
            requested: artifact.requested,
            cards: artifact.deck.cards().to_vec(),
            deck: artifact.deck.view(),
            cached,
        }
    }
}

/// Create the flashcards router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/flashcards", post(generate).get(get_deck))
        .route("/:id/flashcards/actions", post(apply_action))
}

/// POST /api/v1/sessions/:id/flashcards
async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DeckResponse>> {
    let id = session_id(&id)?;
    let request: FlashcardsRequest = json_or_default(&body)?;
    if !(MIN_FLASHCARDS..=MAX_FLASHCARDS).contains(&request.count) {
        return Err(AppError::BadRequest(format!(
            "count must be between {} and {}",
            MIN_FLASHCARDS, MAX_FLASHCARDS
        )));
    }

    let (identity, text) = state.sessions().document_text(id).await?;

    if !request.regenerate {
        let cached = state
            .sessions()
            .with_document(id, &identity, |s| {
                Ok(s.flashcards
                    .as_ref()
                    .filter(|a| a.requested == request.count)
                    .map(|a| DeckResponse::new(a, true)))
            })
            .await?;
        if let Some(response) = cached {
            return Ok(Json(response));
        }
    }

    let cards = state.generator().flashcards(&text, request.count).await?;
    tracing::info!(
        session_id = %id,
        requested = request.count,
        generated = cards.len(),
        "Generated flashcards"
    );

    let artifact = DeckArtifact {
        requested: request.count,
        deck: FlashcardDeck::new(cards),
    };
    let response = DeckResponse::new(&artifact, false);
    state
        .sessions()
        .with_document(id, &identity, move |s| {
            s.flashcards = Some(artifact);
            Ok(())
        })
        .await?;

    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/flashcards
async fn get_deck(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DeckResponse>> {
    let id = session_id(&id)?;
    let response = state
        .sessions()
        .with_session(id, |s| {
            s.flashcards
                .as_ref()
                .map(|a| DeckResponse::new(a, true))
                .ok_or(SessionError::NotGenerated("flashcards"))
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/flashcards/actions
async fn apply_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DeckView>> {
    let id = session_id(&id)?;
    let request: ActionRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid action: {}", e)))?;

    let view = state
        .sessions()
        .with_session(id, |s| {
            let artifact = s
                .flashcards
                .as_mut()
                .ok_or(SessionError::NotGenerated("flashcards"))?;
            Ok(artifact.deck.apply(request.action).map(|_| artifact.deck.view()))
        })
        .await??;

    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use serde_json::json as j;

    use crate::ai::MockProvider;
    use crate::routes::testing::{app_with, json, session_with_document};

    const CARDS: &str = "CARD 1:\nQ: What does chlorophyll absorb?\nA: Blue and red light.\n\n\
        CARD 2:\nQ: What does photosynthesis produce?\nA: Chemical energy.\n";

    #[tokio::test]
    async fn test_deck_practice() {
        let mock = Arc::new(MockProvider::new(vec![CARDS]));
        let (app, _) = app_with(mock.clone());
        let id = session_with_document(&app).await;
        let uri = format!("/api/v1/sessions/{}/flashcards", id);
        let actions = format!("/api/v1/sessions/{}/flashcards/actions", id);

        let (status, body) = json(&app, Method::POST, &uri, Some(j!({"count": 5}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cards"].as_array().unwrap().len(), 2);
        assert_eq!(body["deck"]["side"], "question");

        // Marking before flipping is rejected
        let (status, _) = json(&app, Method::POST, &actions, Some(j!({"action": "correct"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, view) = json(&app, Method::POST, &actions, Some(j!({"action": "flip"}))).await;
        assert_eq!(view["side"], "answer");
        assert_eq!(view["text"], "Blue and red light.");

        let (_, view) = json(&app, Method::POST, &actions, Some(j!({"action": "correct"}))).await;
        assert_eq!(view["position"], 2);
        assert_eq!(view["stats"]["correct"], 1);
        assert_eq!(view["accuracy"], 100.0);

        let (status, _) = json(&app, Method::POST, &actions, Some(j!({"action": "shuffle"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Same count reuses the deck with its progress
        let (_, body) = json(&app, Method::POST, &uri, Some(j!({"count": 5}))).await;
        assert_eq!(body["cached"], true);
        assert_eq!(body["deck"]["position"], 2);
        assert_eq!(mock.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_count_bounds() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![CARDS])));
        let id = session_with_document(&app).await;
        let uri = format!("/api/v1/sessions/{}/flashcards", id);

        for count in [4, 26] {
            let (status, _) = json(&app, Method::POST, &uri, Some(j!({ "count": count }))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_unparseable_reply() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec!["Sorry, I cannot help with that."])));
        let id = session_with_document(&app).await;

        let (status, body) = json(&app, Method::POST, &format!("/api/v1/sessions/{}/flashcards", id), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "ai_bad_response");
    }
}
