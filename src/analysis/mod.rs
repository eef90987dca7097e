//! Document Analysis Module
//!
//! Structural statistics, mindmap depth selection and prompt-sized chunking
//! for extracted document text.

use std::sync::LazyLock;

use regex::Regex;

mod chunker;
mod complexity;
mod depth;

pub use chunker::{chunk_text, DEFAULT_CHUNK_SIZE};
pub use complexity::TextAnalysis;
pub use depth::{DetailChoice, DetailLevel, MindmapConfig};

/// Blank line (possibly containing whitespace) separating paragraphs
pub(crate) static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));
