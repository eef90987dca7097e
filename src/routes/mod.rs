//! Route modules for VeloStudy
//!
//! Every session-scoped endpoint lives under `/api/v1/sessions/:id`. Handlers
//! that call the PDF parser or the AI service snapshot what they need from the
//! session, release it, and write results back only if the session still holds
//! the same document.

pub mod analysis;
pub mod documents;
pub mod flashcards;
pub mod health;
pub mod mindmap;
pub mod quiz;
pub mod sessions;
pub mod summary;
pub mod view;

use axum::{
    body::{Body, Bytes},
    http::{header, StatusCode},
    response::Response,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::session::SessionError;

/// Parse a session id from the path; malformed ids are simply unknown sessions
pub(crate) fn session_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Session(SessionError::NotFound(raw.to_string())))
}

/// Parse an optional JSON body; an empty body means "all defaults"
pub(crate) fn json_or_default<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Build a download response with an RFC 6266 `Content-Disposition`
pub(crate) fn attachment(content: String, content_type: &str, file_name: &str) -> Result<Response> {
    // Plain ASCII fallback plus the exact UTF-8 name
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"; filename*=UTF-8''{}",
                fallback,
                urlencoding::encode(file_name)
            ),
        )
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Router test harness: a full app over a scripted provider
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::ai::MockProvider;
    use crate::config::Config;
    use crate::state::AppState;

    pub fn app_with(mock: Arc<MockProvider>) -> (Router, AppState) {
        let mut config = Config::default();
        config.gemini.api_key = "test-key".to_string();
        config.limits.max_upload_mb = 1;
        let state = AppState::with_provider(config, mock);
        (crate::app(state.clone()), state)
    }

    pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec(), headers)
    }

    pub async fn json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes, _) = send(app, request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn create_session(app: &Router) -> String {
        let (status, body) = json(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    pub fn multipart_request(uri: &str, field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
        let boundary = "velostudy-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"{n}\"\r\nContent-Type: application/pdf\r\n\r\n",
                b = boundary,
                f = field,
                n = file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Create a session and load a small text PDF into it
    pub async fn session_with_document(app: &Router) -> String {
        let id = create_session(app).await;
        let pdf = crate::pdf::fixtures::pdf_with_lines(&[
            "Photosynthesis converts light into chemical energy.",
            "Chlorophyll absorbs mostly blue and red light.",
        ]);
        let uri = format!("/api/v1/sessions/{}/document", id);
        let (status, _, _) = send(app, multipart_request(&uri, "file", "biology.pdf", &pdf)).await;
        assert_eq!(status, StatusCode::OK);
        id
    }
}
