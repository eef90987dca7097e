//! PDF Module
//!
//! Text extraction for uploaded PDF documents.

mod error;
mod extractor;

pub use error::PdfError;
pub use extractor::{extract_text, is_pdf, PdfExtractor, DEFAULT_EXTRACT_TIMEOUT_SECS};
