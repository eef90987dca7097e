//! Paragraph-aware text chunking
//!
//! Large documents do not fit in a single prompt. Text is packed into chunks
//! of at most `max_chunk_size` characters, splitting only at paragraph
//! boundaries so each chunk keeps its local context.

use super::PARAGRAPH_BREAK;

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 25_000;

/// Split text into prompt-sized chunks
///
/// A paragraph longer than the limit is emitted as a chunk of its own.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    if text.chars().count() <= max_chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for paragraph in PARAGRAPH_BREAK.split(text) {
        let paragraph_len = paragraph.chars().count();

        if current_len + paragraph_len > max_chunk_size {
            push_trimmed(&mut chunks, &current);
            current.clear();
            current_len = 0;
        }

        current.push_str(paragraph);
        current.push_str("\n\n");
        current_len += paragraph_len + 2;
    }

    push_trimmed(&mut chunks, &current);
    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = chunk_text("just a little text", 100);
        assert_eq!(chunks, vec!["just a little text".to_string()]);
    }

    #[test]
    fn test_splits_on_paragraphs() {
        let text = format!("{}\n\n{}\n\n{}", "a".repeat(40), "b".repeat(40), "c".repeat(40));
        let chunks = chunk_text(&text, 90);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{}\n\n{}", "a".repeat(40), "b".repeat(40)));
        assert_eq!(chunks[1], "c".repeat(40));
    }

    #[test]
    fn test_oversized_paragraph_kept_whole() {
        let text = format!("{}\n\n{}", "x".repeat(50), "y".repeat(10));
        let chunks = chunk_text(&text, 20);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 50);
        assert_eq!(chunks[1], "y".repeat(10));
    }

    #[test]
    fn test_no_content_lost() {
        let paragraphs: Vec<String> = (0..30).map(|i| format!("paragraph {i} body")).collect();
        let text = paragraphs.join("\n\n");
        let chunks = chunk_text(&text, 60);

        assert!(chunks.len() > 1);
        let rejoined = chunks.join("\n\n");
        for paragraph in &paragraphs {
            assert!(rejoined.contains(paragraph.as_str()));
        }
    }
}
