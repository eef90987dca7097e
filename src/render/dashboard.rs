//! Server-rendered study dashboard
//!
//! Fills a static page template with the session's cached artifacts. Every
//! piece of document or model text goes in escaped; the mindmap is embedded
//! last through [`embed_mindmap`].

use std::fmt::Write;

use html_escape::encode_text;
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};

use crate::ai::Summary;
use crate::session::{AnalysisArtifact, DocumentInfo, MindmapArtifact};
use crate::study::{DeckView, QuizResults, QuizView};

use super::inject::{embed_mindmap, RenderError};
use super::markmap::mindmap_document;

const DASHBOARD_TEMPLATE: &str = include_str!("templates/dashboard.html");

/// Height of the embedded mindmap frame in pixels
pub const MINDMAP_FRAME_HEIGHT: u32 = 800;

/// Everything the dashboard shows, snapshotted from a session
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub document: Option<DocumentInfo>,
    pub analysis: Option<AnalysisArtifact>,
    pub mindmap: Option<MindmapArtifact>,
    pub summary: Option<Summary>,
    pub flashcard: Option<DeckView>,
    pub quiz: Option<QuizView>,
    pub quiz_results: Option<QuizResults>,
}

pub fn dashboard_page(view: &DashboardView) -> Result<String, RenderError> {
    let mut handlers = Vec::new();

    if let Some(document) = &view.document {
        let text = format!(
            "{} ({:.1} KB, {} characters)",
            document.file_name,
            document.size_bytes as f64 / 1024.0,
            document.char_count
        );
        handlers.push(element!("#document", move |el| {
            el.set_inner_content(&text, ContentType::Text);
            Ok(())
        }));
    }

    if let Some(analysis) = &view.analysis {
        let fragment = analysis_fragment(analysis);
        handlers.push(element!("#analysis", move |el| {
            el.set_inner_content(&fragment, ContentType::Html);
            Ok(())
        }));
    }

    if let Some(mindmap) = &view.mindmap {
        let source = mindmap.markdown.clone();
        handlers.push(element!("#mindmap-source", move |el| {
            el.set_inner_content(&source, ContentType::Text);
            Ok(())
        }));
    }

    if let Some(summary) = &view.summary {
        let fragment = summary_fragment(summary);
        handlers.push(element!("#summary", move |el| {
            el.set_inner_content(&fragment, ContentType::Html);
            Ok(())
        }));
    }

    if let Some(deck) = &view.flashcard {
        let fragment = flashcard_fragment(deck);
        handlers.push(element!("#flashcards", move |el| {
            el.set_inner_content(&fragment, ContentType::Html);
            Ok(())
        }));
    }

    if let Some(quiz) = &view.quiz {
        let fragment = quiz_fragment(quiz, view.quiz_results.as_ref());
        handlers.push(element!("#quiz", move |el| {
            el.set_inner_content(&fragment, ContentType::Html);
            Ok(())
        }));
    }

    let page = rewrite_str(
        DASHBOARD_TEMPLATE,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| RenderError::RewriteError(e.to_string()))?;

    match &view.mindmap {
        Some(mindmap) => embed_mindmap(
            &page,
            "#mindmap",
            &mindmap_document(&mindmap.markdown, &mindmap.config),
            MINDMAP_FRAME_HEIGHT,
        ),
        None => Ok(page),
    }
}

fn metric(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = write!(
        out,
        r#"<li><span class="label">{}</span><span class="value">{}</span></li>"#,
        encode_text(label),
        value
    );
}

fn analysis_fragment(artifact: &AnalysisArtifact) -> String {
    let a = &artifact.analysis;
    let mut out = String::from(r#"<ul class="metrics">"#);
    metric(&mut out, "Words", a.word_count);
    metric(&mut out, "Sentences", a.sentence_count);
    metric(&mut out, "Paragraphs", a.paragraph_count);
    metric(&mut out, "Headings", a.potential_headings);
    metric(&mut out, "Complexity", format!("{:.1}", a.complexity_score));
    metric(&mut out, "Detail", artifact.recommended.detail_level.title());
    out.push_str("</ul>");
    out
}

fn summary_fragment(summary: &Summary) -> String {
    format!(
        r#"<p class="summary">{}</p><p class="empty">{} words (target {})</p>"#,
        encode_text(&summary.summary),
        summary.actual_word_count,
        summary.target_word_count
    )
}

fn flashcard_fragment(deck: &DeckView) -> String {
    let mut out = format!(
        r#"<p>Card {} of {} ({})</p><div class="card">{}</div>"#,
        deck.position,
        deck.total,
        deck.side,
        encode_text(&deck.text)
    );
    if let Some(accuracy) = deck.accuracy {
        let _ = write!(
            out,
            "<p>Correct: {} | Incorrect: {} | Accuracy: {:.1}%</p>",
            deck.stats.correct, deck.stats.incorrect, accuracy
        );
    }
    out
}

fn quiz_fragment(quiz: &QuizView, results: Option<&QuizResults>) -> String {
    if let Some(results) = results {
        return format!(
            "<p><strong>Score: {}/{} ({:.1}%)</strong> {}</p>",
            results.score,
            results.total,
            results.percentage,
            results.grade.message()
        );
    }

    let mut out = format!("<p>Answered {} of {} questions.</p>", quiz.answered, quiz.total);
    if let Some(current) = &quiz.current {
        let _ = write!(
            out,
            "<p><strong>Question {}:</strong> {}</p><ul>",
            current.number,
            encode_text(&current.question)
        );
        for option in &current.options {
            let _ = write!(out, "<li>{}</li>", encode_text(option));
        }
        out.push_str("</ul>");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DetailLevel, MindmapConfig};
    use chrono::Utc;

    #[test]
    fn test_empty_dashboard() {
        let html = dashboard_page(&DashboardView::default()).unwrap();
        assert!(html.contains("No document loaded"));
        assert!(html.contains("No mindmap generated yet."));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_dashboard_escapes_model_text() {
        let view = DashboardView {
            summary: Some(Summary::new("<script>alert(1)</script> text".to_string(), 100)),
            ..Default::default()
        };
        let html = dashboard_page(&view).unwrap();

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; text"));
        assert!(html.contains("target 100"));
    }

    #[test]
    fn test_dashboard_embeds_mindmap() {
        let view = DashboardView {
            analysis: Some(AnalysisArtifact::compute("Intro\n\nSome sentence here.")),
            mindmap: Some(MindmapArtifact {
                markdown: "# Topic\n## Branch".to_string(),
                config: MindmapConfig::for_level(DetailLevel::Basic),
                generated_at: Utc::now(),
            }),
            ..Default::default()
        };
        let html = dashboard_page(&view).unwrap();

        assert!(html.contains("<iframe"));
        assert!(html.contains("Complexity"));
        assert!(html.contains("## Branch"));
        assert!(!html.contains("No mindmap generated yet."));
    }
}
