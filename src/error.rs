//! Error types for the VeloStudy server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ai::GenerationError;
use crate::pdf::PdfError;
use crate::render::RenderError;
use crate::session::SessionError;
use crate::study::StudyError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("AI error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Study error: {0}")]
    Study(#[from] StudyError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Pdf(e) => {
                let error_type = match e {
                    PdfError::NotPdf(_) => "unsupported_media_type",
                    PdfError::Timeout(_) => "pdf_timeout",
                    _ => "pdf_error",
                };
                (e.status_code(), error_type, e.to_string())
            }
            AppError::Generation(e) => {
                let status = e.status_code();
                if status.is_server_error() {
                    tracing::error!("AI request failed: {}", e);
                }
                let error_type = match e {
                    GenerationError::Timeout(_) => "ai_timeout",
                    GenerationError::Api { status: 429, .. } => "ai_rate_limited",
                    GenerationError::EmptyResponse | GenerationError::Unparseable(_) => "ai_bad_response",
                    _ => "ai_error",
                };
                let message = match e {
                    // Upstream bodies can be long and may echo the request
                    GenerationError::Api { status, .. } => format!("AI service returned HTTP {}", status),
                    other => other.to_string(),
                };
                (status, error_type, message)
            }
            AppError::Session(e) => {
                let error_type = match e {
                    SessionError::NotFound(_) | SessionError::NotGenerated(_) => "not_found",
                    SessionError::Expired(_) => "session_expired",
                    SessionError::TooManySessions(_) => "too_many_sessions",
                    SessionError::NoDocument | SessionError::DocumentChanged => "conflict",
                };
                (e.status_code(), error_type, e.to_string())
            }
            AppError::Study(e) => (e.status_code(), "invalid_state", e.to_string()),
            AppError::Render(e) => {
                tracing::error!("Render error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "render_error",
                    "Failed to render page".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
