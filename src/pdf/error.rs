//! PDF extraction error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    /// Upload does not look like a PDF at all
    #[error("Not a PDF file: {0}")]
    NotPdf(String),

    /// The parser rejected the document
    #[error("Error reading PDF: {0}")]
    Parse(String),

    /// Parsed fine but produced no text (scanned or image-only PDF)
    #[error("No text could be extracted from the PDF. Please ensure it's not scanned or image-based.")]
    NoText,

    #[error("PDF extraction timed out after {0} seconds")]
    Timeout(u64),
}

impl PdfError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotPdf(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Parse(_) | Self::NoText => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}
