//! Plain-text extraction from PDF bytes
//!
//! Parsing is CPU-bound and the underlying parser can panic on hostile input,
//! so extraction runs on the blocking pool under a timeout. A panic surfaces
//! as a `JoinError` and is reported as a parse failure.

use tokio::time::{timeout, Duration};

use super::PdfError;

/// Magic bytes every PDF starts with
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Default extraction timeout
pub const DEFAULT_EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Check the `%PDF-` header, tolerating leading whitespace
pub fn is_pdf(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    data[start..].starts_with(PDF_MAGIC)
}

/// Extract the text of every page, skipping pages without text
///
/// Pages are joined with a newline and the result is trimmed.
pub fn extract_text(data: &[u8]) -> Result<String, PdfError> {
    if !is_pdf(data) {
        return Err(PdfError::NotPdf("missing %PDF- header".to_string()));
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| PdfError::Parse(e.to_string()))?;

    let mut text = String::new();
    for page in pages.iter().filter(|p| !p.is_empty()) {
        text.push_str(page);
        text.push('\n');
    }

    let text = text.trim();
    if text.is_empty() {
        return Err(PdfError::NoText);
    }

    Ok(text.to_string())
}

/// Async front-end for [`extract_text`]
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    timeout_secs: u64,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_EXTRACT_TIMEOUT_SECS)
    }
}

impl PdfExtractor {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Extract text off the async runtime
    pub async fn extract(&self, data: Vec<u8>) -> Result<String, PdfError> {
        let size = data.len();
        let task = tokio::task::spawn_blocking(move || extract_text(&data));

        let joined = timeout(Duration::from_secs(self.timeout_secs), task)
            .await
            .map_err(|_| PdfError::Timeout(self.timeout_secs))?;

        let text = joined.map_err(|e| {
            tracing::error!(size, "PDF parser task failed: {}", e);
            PdfError::Parse("the PDF parser crashed on this document".to_string())
        })??;

        tracing::debug!(size, chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::pdf_with_lines;

    #[test]
    fn test_magic_detection() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(is_pdf(b"\r\n  %PDF-1.4"));
        assert!(!is_pdf(b"PK\x03\x04epub"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let result = extract_text(b"hello, not a pdf");
        assert!(matches!(result, Err(PdfError::NotPdf(_))));
    }

    #[test]
    fn test_rejects_corrupt_pdf() {
        let result = extract_text(b"%PDF-1.4\nthis is not really a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_) | PdfError::NoText)));
    }

    #[test]
    fn test_extracts_text() {
        let pdf = pdf_with_lines(&["Hello World"]);
        let text = extract_text(&pdf).unwrap();
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_page_without_text_is_rejected() {
        let pdf = pdf_with_lines(&[]);
        let result = extract_text(&pdf);
        assert!(matches!(result, Err(PdfError::NoText)));
    }

    #[tokio::test]
    async fn test_async_extraction() {
        let extractor = PdfExtractor::default();
        let text = extractor.extract(pdf_with_lines(&["Async text"])).await.unwrap();
        assert!(text.contains("Async"));
    }

    #[tokio::test]
    async fn test_async_extraction_propagates_errors() {
        let extractor = PdfExtractor::new(5);
        let result = extractor.extract(b"nope".to_vec()).await;
        assert!(matches!(result, Err(PdfError::NotPdf(_))));
    }
}
