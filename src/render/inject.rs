//! Mindmap iframe injection using lol_html
//!
//! The Markmap page is a complete document with its own scripts, so it is
//! embedded through `srcdoc` rather than spliced into the host page.

use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings, Selector};

/// Errors while rendering HTML output
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("No element matches selector: {0}")]
    SelectorNotFound(String),

    #[error("HTML rewrite failed: {0}")]
    RewriteError(String),
}

/// Replace the content of the element matching `selector` with an iframe
/// showing `document`
pub fn embed_mindmap(host: &str, selector: &str, document: &str, height: u32) -> Result<String, RenderError> {
    selector
        .parse::<Selector>()
        .map_err(|e| RenderError::InvalidSelector(format!("{}: {}", selector, e)))?;

    let iframe = format!(
        r#"<iframe class="mindmap-frame" title="Mindmap" scrolling="yes" style="width:100%;height:{}px;border:0" srcdoc="{}"></iframe>"#,
        height,
        html_escape::encode_double_quoted_attribute(document)
    );

    let mut matched = false;
    let output = rewrite_str(
        host,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                if !matched {
                    el.set_inner_content(&iframe, ContentType::Html);
                    matched = true;
                }
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| RenderError::RewriteError(e.to_string()))?;

    if !matched {
        return Err(RenderError::SelectorNotFound(selector.to_string()));
    }

    Ok(output)
}
