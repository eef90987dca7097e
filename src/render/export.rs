//! Plain-source export of a mindmap outline

/// Minimal HTML page showing the outline as preformatted text
pub fn markdown_export(markdown: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head><meta charset=\"UTF-8\"><title>Mindmap source</title>\n",
            "<style>body{{font-family:monospace;margin:20px;background:#fafafa}}",
            "pre{{white-space:pre-wrap;word-wrap:break-word}}</style></head>\n",
            "<body><pre>{}</pre></body>\n",
            "</html>\n"
        ),
        html_escape::encode_text(markdown)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        let html = markdown_export("# A & B\n- <b>bold</b>");
        assert!(html.contains("# A &amp; B"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }
}
