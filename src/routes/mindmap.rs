//! Mindmap Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/mindmap - Generate (or reuse) the mindmap outline
//! - GET /api/v1/sessions/:id/mindmap - Cached outline and its configuration
//! - GET /api/v1/sessions/:id/mindmap/view - Interactive Markmap page
//! - GET /api/v1/sessions/:id/mindmap/source - Escaped outline source page
//! - GET /api/v1/sessions/:id/mindmap/download?format=md|html|markmap - Attachment

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::{Html, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{analysis::ensure_analysis, attachment, json_or_default, session_id};
use crate::analysis::{DetailChoice, MindmapConfig};
use crate::error::Result;
use crate::render::{markdown_export, mindmap_document};
use crate::session::{MindmapArtifact, SessionError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MindmapRequest {
    pub detail_level: DetailChoice,
    /// Ignore a cached outline with the same configuration
    pub regenerate: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapResponse {
    pub markdown: String,
    pub config: MindmapConfig,
    pub generated_at: DateTime<Utc>,
    pub cached: bool,
}

impl MindmapResponse {
    fn new(artifact: MindmapArtifact, cached: bool) -> Self {
        Self {
            markdown: artifact.markdown,
            config: artifact.config,
            generated_at: artifact.generated_at,
            cached,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    #[default]
    Md,
    /// Escaped source page, as served by `/source`
    Html,
    /// Standalone interactive Markmap page
    Markmap,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub format: DownloadFormat,
}

/// Create the mindmap router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/mindmap", post(generate).get(get_mindmap))
        .route("/:id/mindmap/view", get(view))
        .route("/:id/mindmap/source", get(source))
        .route("/:id/mindmap/download", get(download))
}

/// POST /api/v1/sessions/:id/mindmap
async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MindmapResponse>> {
    let id = session_id(&id)?;
    let request: MindmapRequest = json_or_default(&body)?;

    let (identity, text, analysis) = ensure_analysis(&state, id).await?;
    let config = MindmapConfig::resolve(request.detail_level, analysis.analysis.complexity_score);

    if !request.regenerate {
        let cached = state
            .sessions()
            .with_document(id, &identity, |s| {
                Ok(s.mindmap.clone().filter(|m| m.config == config))
            })
            .await?;
        if let Some(artifact) = cached {
            return Ok(Json(MindmapResponse::new(artifact, true)));
        }
    }

    tracing::info!(
        session_id = %id,
        detail_level = config.detail_level.as_str(),
        max_levels = config.max_levels,
        "Generating mindmap"
    );

    let markdown = state
        .generator()
        .mindmap(&text, &analysis.analysis, &config)
        .await?;

    let artifact = MindmapArtifact {
        markdown,
        config,
        generated_at: Utc::now(),
    };
    let stored = artifact.clone();
    state
        .sessions()
        .with_document(id, &identity, move |s| {
            s.mindmap = Some(stored);
            Ok(())
        })
        .await?;

    Ok(Json(MindmapResponse::new(artifact, false)))
}

async fn cached_mindmap(state: &AppState, id: &str) -> Result<(MindmapArtifact, String)> {
    let id = session_id(id)?;
    let found = state
        .sessions()
        .with_session(id, |s| {
            let mindmap = s.mindmap.clone().ok_or(SessionError::NotGenerated("mindmap"))?;
            let stem = s.document.as_ref().map(|d| d.stem().to_string()).unwrap_or_default();
            Ok((mindmap, stem))
        })
        .await?;
    Ok(found)
}

/// GET /api/v1/sessions/:id/mindmap
async fn get_mindmap(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MindmapResponse>> {
    let (artifact, _) = cached_mindmap(&state, &id).await?;
    Ok(Json(MindmapResponse::new(artifact, true)))
}

/// GET /api/v1/sessions/:id/mindmap/view
async fn view(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>> {
    let (artifact, _) = cached_mindmap(&state, &id).await?;
    Ok(Html(mindmap_document(&artifact.markdown, &artifact.config)))
}

/// GET /api/v1/sessions/:id/mindmap/source
async fn source(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>> {
    let (artifact, _) = cached_mindmap(&state, &id).await?;
    Ok(Html(markdown_export(&artifact.markdown)))
}

/// GET /api/v1/sessions/:id/mindmap/download
async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response> {
    let (artifact, stem) = cached_mindmap(&state, &id).await?;

    match query.format {
        DownloadFormat::Md => attachment(
            artifact.markdown,
            "text/markdown; charset=utf-8",
            &format!("mindmap_{}.md", stem),
        ),
        DownloadFormat::Html => attachment(
            markdown_export(&artifact.markdown),
            "text/html; charset=utf-8",
            &format!("mindmap_{}.html", stem),
        ),
        DownloadFormat::Markmap => attachment(
            mindmap_document(&artifact.markdown, &artifact.config),
            "text/html; charset=utf-8",
            &format!("mindmap_{}_interactive.html", stem),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::json as j;

    use crate::ai::{GenerationError, MockProvider};
    use crate::routes::testing::{app_with, json, send, session_with_document};

    const OUTLINE: &str = "```markdown\n# Photosynthesis\n## Light\n### Chlorophyll\n```";

    #[tokio::test]
    async fn test_generate_and_reuse() {
        let mock = Arc::new(MockProvider::new(vec![OUTLINE]));
        let (app, _) = app_with(mock.clone());
        let id = session_with_document(&app).await;
        let uri = format!("/api/v1/sessions/{}/mindmap", id);

        let (status, body) = json(&app, Method::POST, &uri, Some(j!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["markdown"], "# Photosynthesis\n## Light\n### Chlorophyll");
        assert_eq!(body["config"]["detailLevel"], "basic");
        assert_eq!(body["cached"], false);

        // Same configuration reuses the outline
        let (_, body) = json(&app, Method::POST, &uri, None).await;
        assert_eq!(body["cached"], true);
        assert_eq!(mock.prompt_count(), 1);

        // A forced level is a different configuration
        let (_, body) = json(&app, Method::POST, &uri, Some(j!({"detailLevel": "comprehensive"}))).await;
        assert_eq!(body["cached"], false);
        assert_eq!(body["config"]["maxLevels"], 6);
        assert_eq!(body["config"]["expandLevel"], 1);
        assert_eq!(mock.prompt_count(), 2);

        let (status, _) = json(&app, Method::POST, &uri, Some(j!({"detailLevel": "extreme"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_views_and_downloads() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![OUTLINE])));
        let id = session_with_document(&app).await;
        json(&app, Method::POST, &format!("/api/v1/sessions/{}/mindmap", id), None).await;

        let get = |uri: String| Request::builder().uri(uri).body(Body::empty()).unwrap();

        let (status, html, _) = send(&app, get(format!("/api/v1/sessions/{}/mindmap/view", id))).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("const INITIAL_EXPAND_LEVEL = 2;"));
        assert!(html.contains("## Light"));

        let (status, body, headers) =
            send(&app, get(format!("/api/v1/sessions/{}/mindmap/download?format=md", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"# Photosynthesis\n## Light\n### Chlorophyll");
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains("mindmap_biology.md"));

        let (_, body, headers) = send(&app, get(format!("/api/v1/sessions/{}/mindmap/download?format=html", id))).await;
        assert!(headers[header::CONTENT_DISPOSITION].to_str().unwrap().contains("mindmap_biology.html"));
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("<pre># Photosynthesis"));
        assert!(!body.contains("markmap"));

        let (status, body, headers) =
            send(&app, get(format!("/api/v1/sessions/{}/mindmap/download?format=markmap", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("mindmap_biology_interactive.html"));
        assert!(String::from_utf8(body).unwrap().contains("const INITIAL_EXPAND_LEVEL = 2;"));

        let (status, html, _) = send(&app, get(format!("/api/v1/sessions/{}/mindmap/source", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(html).unwrap().contains("<pre># Photosynthesis"));
    }

    #[tokio::test]
    async fn test_mindmap_requires_document() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![OUTLINE])));
        let id = crate::routes::testing::create_session(&app).await;

        let (status, body) = json(&app, Method::POST, &format!("/api/v1/sessions/{}/mindmap", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["message"].as_str().unwrap().contains("upload a PDF"));
    }

    #[tokio::test]
    async fn test_ai_failure_is_bad_gateway() {
        let mock = Arc::new(MockProvider::failing(GenerationError::Api {
            status: 500,
            body: "boom".to_string(),
        }));
        let (app, _) = app_with(mock);
        let id = session_with_document(&app).await;

        let (status, body) = json(&app, Method::POST, &format!("/api/v1/sessions/{}/mindmap", id), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "ai_error");

        let (status, _) = json(&app, Method::GET, &format!("/api/v1/sessions/{}/mindmap", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
