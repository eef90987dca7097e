//! Text complexity scoring
//!
//! Derives rough structural statistics from extracted document text and turns
//! them into a single complexity score. The score drives how deep and how
//! detailed the generated mindmap should be.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::PARAGRAPH_BREAK;

/// Runs of sentence-ending punctuation
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// Capitalised lines without sentence punctuation
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-Z][^.!?]*$").expect("valid heading regex"));

/// Structural statistics for a document's text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub potential_headings: usize,
    pub complexity_score: f64,
}

impl TextAnalysis {
    /// Analyze a block of text
    pub fn analyze(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        let char_count = text.chars().count();
        let sentence_count = SENTENCE_END.find_iter(text).count();
        let paragraph_count = PARAGRAPH_BREAK.split(text.trim()).count();
        let potential_headings = HEADING_LINE.find_iter(text).count();

        let complexity_score = (word_count as f64 / 100.0) * 0.4
            + (sentence_count as f64 / 10.0) * 0.3
            + (paragraph_count as f64 / 5.0) * 0.2
            + (potential_headings as f64 / 3.0) * 0.1;

        Self {
            word_count,
            char_count,
            sentence_count,
            paragraph_count,
            potential_headings,
            complexity_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_simple_text() {
        let text = "Introduction\nRust is fast. It is safe!\n\nOwnership\nBorrowing rules apply?";
        let analysis = TextAnalysis::analyze(text);

        assert_eq!(analysis.word_count, 11);
        assert_eq!(analysis.sentence_count, 3);
        assert_eq!(analysis.paragraph_count, 2);
        assert_eq!(analysis.char_count, text.chars().count());
    }

    #[test]
    fn test_punctuation_runs_count_once() {
        let analysis = TextAnalysis::analyze("Wait... what?! Really.");
        assert_eq!(analysis.sentence_count, 3);
    }

    #[test]
    fn test_heading_detection() {
        let analysis = TextAnalysis::analyze("chapter one.\nSummary\nlowercase line.");
        assert_eq!(analysis.potential_headings, 1);
    }

    #[test]
    fn test_empty_text_has_one_paragraph() {
        let analysis = TextAnalysis::analyze("");
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.paragraph_count, 1);
        assert!((analysis.complexity_score - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_score_formula() {
        // 200 words, no punctuation, one paragraph, no capitalised lines
        let text = vec!["word"; 200].join(" ");
        let analysis = TextAnalysis::analyze(&text);

        let expected = 2.0 * 0.4 + 0.0 + (1.0 / 5.0) * 0.2 + 0.0;
        assert!((analysis.complexity_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unicode_char_count() {
        let analysis = TextAnalysis::analyze("héllo wörld");
        assert_eq!(analysis.char_count, 11);
        assert_eq!(analysis.word_count, 2);
    }
}
