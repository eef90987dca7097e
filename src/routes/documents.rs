//! Document Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/document - Upload a PDF (multipart field `file` or `document`)
//! - GET /api/v1/sessions/:id/document/text - Extracted text

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::session_id;
use crate::error::{AppError, Result};
use crate::pdf::{is_pdf, PdfError};
use crate::session::{DocumentIdentity, DocumentInfo, DocumentLoad, LoadedDocument};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub status: DocumentLoad,
    pub document: DocumentInfo,
    pub word_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTextResponse {
    pub file_name: String,
    pub char_count: usize,
    pub text: String,
}

/// Create the documents router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/:id/document", post(upload_document))
        .route("/:id/document/text", get(get_text))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// POST /api/v1/sessions/:id/document
///
/// Extracts the PDF's text and makes it the session's document. Re-uploading
/// the identical file keeps every cached artifact and skips extraction.
async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let id = session_id(&id)?;
    // Fail fast on unknown sessions before reading the body
    state.sessions().info(id).await?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        tracing::debug!(field = %name, file_name = ?field.file_name(), "Received multipart field");

        if name == "file" || name == "document" {
            let file_name = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "document.pdf".to_string());
            let data = field.bytes().await?;
            upload = Some((file_name, data));
            break;
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing 'file' field in upload".to_string()))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }
    if !is_pdf(&data) {
        return Err(PdfError::NotPdf(file_name).into());
    }

    let identity = DocumentIdentity::new(&file_name, &data);
    if state.sessions().has_document(id, &identity).await? {
        tracing::info!(session_id = %id, file_name = %file_name, "Same document re-uploaded, keeping artifacts");
        let (_, text) = state.sessions().document_text(id).await?;
        let document = state
            .sessions()
            .info(id)
            .await?
            .document
            .ok_or_else(|| AppError::Internal("document vanished after identity check".to_string()))?;
        return Ok(Json(UploadResponse {
            status: DocumentLoad::Unchanged,
            document,
            word_count: text.split_whitespace().count(),
        }));
    }

    let size_bytes = data.len();
    let text = state.extractor().extract(data.to_vec()).await?;
    let word_count = text.split_whitespace().count();

    tracing::info!(
        session_id = %id,
        file_name = %file_name,
        size_bytes = size_bytes,
        words = word_count,
        "Extracted text from PDF"
    );

    let document = LoadedDocument::new(identity, text, size_bytes);
    let info = document.info();
    let status = state.sessions().load_document(id, document).await?;

    Ok(Json(UploadResponse {
        status,
        document: info,
        word_count,
    }))
}

/// GET /api/v1/sessions/:id/document/text
async fn get_text(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DocumentTextResponse>> {
    let id = session_id(&id)?;
    let (identity, text) = state.sessions().document_text(id).await?;

    Ok(Json(DocumentTextResponse {
        file_name: identity.file_name,
        char_count: text.chars().count(),
        text: text.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};

    use crate::ai::MockProvider;
    use crate::pdf::fixtures::pdf_with_lines;
    use crate::routes::testing::{app_with, create_session, json, multipart_request, send};

    fn upload_uri(id: &str) -> String {
        format!("/api/v1/sessions/{}/document", id)
    }

    #[tokio::test]
    async fn test_upload_and_read_text() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = create_session(&app).await;
        let pdf = pdf_with_lines(&["Mitochondria produce energy."]);

        let (status, body, _) = send(&app, multipart_request(&upload_uri(&id), "document", "cells.pdf", &pdf)).await;
        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "loaded");
        assert_eq!(body["document"]["fileName"], "cells.pdf");
        assert!(body["wordCount"].as_u64().unwrap() > 0);

        let (status, body) = json(&app, Method::GET, &format!("/api/v1/sessions/{}/document/text", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("Mitochondria"));
    }

    #[tokio::test]
    async fn test_reupload_same_file_is_unchanged() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = create_session(&app).await;
        let pdf = pdf_with_lines(&["Same content."]);

        send(&app, multipart_request(&upload_uri(&id), "file", "a.pdf", &pdf)).await;
        let (status, body, _) = send(&app, multipart_request(&upload_uri(&id), "file", "a.pdf", &pdf)).await;
        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "unchanged");

        let other = pdf_with_lines(&["Different content."]);
        let (_, body, _) = send(&app, multipart_request(&upload_uri(&id), "file", "a.pdf", &other)).await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "replaced");
    }

    #[tokio::test]
    async fn test_rejects_non_pdf() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = create_session(&app).await;

        let (status, body, _) = send(&app, multipart_request(&upload_uri(&id), "file", "notes.txt", b"plain text")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "unsupported_media_type");
    }

    #[tokio::test]
    async fn test_rejects_pdf_without_text() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = create_session(&app).await;
        let pdf = pdf_with_lines(&[]);

        let (status, body, _) = send(&app, multipart_request(&upload_uri(&id), "file", "scan.pdf", &pdf)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "pdf_error");
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = create_session(&app).await;

        let (status, _, _) = send(&app, multipart_request(&upload_uri(&id), "other", "a.pdf", b"%PDF-1.4")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_too_large() {
        // Test app caps uploads at 1 MB
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = create_session(&app).await;
        let mut big = b"%PDF-1.4\n".to_vec();
        big.resize(2 * 1024 * 1024, b' ');

        let (status, _, _) = send(&app, multipart_request(&upload_uri(&id), "file", "big.pdf", &big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_text_before_upload() {
        let (app, _) = app_with(Arc::new(MockProvider::new(vec![])));
        let id = create_session(&app).await;

        let (status, body) = json(&app, Method::GET, &format!("/api/v1/sessions/{}/document/text", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }
}
