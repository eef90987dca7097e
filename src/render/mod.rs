//! HTML rendering module
//!
//! Provides the HTML output of the service:
//! - Interactive Markmap mindmap pages
//! - Escaped source export of mindmap outlines
//! - Iframe injection of mindmaps into host pages
//! - The server-rendered study dashboard
//!
//! Uses lol_html for streaming HTML rewriting.

mod dashboard;
mod export;
mod inject;
mod markmap;

pub use dashboard::{dashboard_page, DashboardView, MINDMAP_FRAME_HEIGHT};
pub use export::markdown_export;
pub use inject::{embed_mindmap, RenderError};
pub use markmap::{escape_template_literal, mindmap_document};
