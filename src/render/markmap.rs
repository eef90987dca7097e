//! Markmap page rendering
//!
//! The outline is embedded in a JavaScript template literal inside an inline
//! `<script>`, so it is escaped for both contexts before substitution.

use crate::analysis::MindmapConfig;

const MINDMAP_TEMPLATE: &str = include_str!("templates/mindmap.html");

const MARKDOWN_SLOT: &str = "__MINDMAP_MARKDOWN__";
const EXPAND_SLOT: &str = "__INITIAL_EXPAND_LEVEL__";

/// Escape markdown for a JS template literal inside a `<script>` element
pub fn escape_template_literal(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 8);
    let mut chars = markdown.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '"' => out.push_str("\\\""),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            // No `<` reaches script data, so neither `</script` nor `<!--` can appear
            '<' => out.push_str("\\x3C"),
            _ => out.push(c),
        }
    }

    out
}

/// Full standalone HTML page rendering `markdown` as an interactive mindmap
pub fn mindmap_document(markdown: &str, config: &MindmapConfig) -> String {
    // Expand level first so the outline text is never rescanned for slots
    MINDMAP_TEMPLATE
        .replace(EXPAND_SLOT, &config.expand_level.to_string())
        .replace(MARKDOWN_SLOT, &escape_template_literal(markdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DetailLevel;

    #[test]
    fn test_escape_sequences() {
        assert_eq!(escape_template_literal(r"a\b"), r"a\\b");
        assert_eq!(escape_template_literal("`code`"), r"\`code\`");
        assert_eq!(escape_template_literal("${x} $y"), r"\${x} $y");
        assert_eq!(escape_template_literal(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_template_literal("</script>"), r"\x3C/script>");
        assert_eq!(escape_template_literal("a < b"), r"a \x3C b");
    }

    #[test]
    fn test_document_embeds_outline() {
        let config = MindmapConfig::for_level(DetailLevel::Detailed);
        let html = mindmap_document("# Title\n## Part `one`", &config);

        assert!(html.contains("# Title\n## Part \\`one\\`"));
        assert!(html.contains("const INITIAL_EXPAND_LEVEL = 1;"));
        assert!(!html.contains(MARKDOWN_SLOT));
        assert!(html.contains("markmap-view@0.15.3"));
    }

    #[test]
    fn test_outline_cannot_close_script() {
        let config = MindmapConfig::for_level(DetailLevel::Basic);
        let html = mindmap_document("# Evil\n</script><script>alert(1)</script>", &config);

        // Only the template's own script closers remain
        let closers = html.matches("</script>").count();
        let template_closers = MINDMAP_TEMPLATE.matches("</script>").count();
        assert_eq!(closers, template_closers);
    }

    #[test]
    fn test_outline_cannot_open_comment_in_script() {
        let config = MindmapConfig::for_level(DetailLevel::Basic);
        let html = mindmap_document("# A\n<!--<script>", &config);

        assert!(!html.contains("<!--<script>"));
        assert!(html.contains("# A\n\\x3C!--\\x3Cscript>"));
    }

    #[test]
    fn test_outline_containing_slot_name() {
        let config = MindmapConfig::for_level(DetailLevel::Basic);
        let html = mindmap_document("# __INITIAL_EXPAND_LEVEL__", &config);
        assert!(html.contains("# __INITIAL_EXPAND_LEVEL__"));
    }
}
