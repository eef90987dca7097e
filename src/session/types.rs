//! Session types
//!
//! A study session holds the loaded document, its extracted text and every
//! artifact generated from it.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::ai::{Difficulty, Summary};
use crate::analysis::{MindmapConfig, TextAnalysis};
use crate::study::{FlashcardDeck, QuizSession};

// ============================================================================
// Constants
// ============================================================================

/// Distinct summary lengths remembered per session
pub const SUMMARY_CACHE_CAPACITY: usize = 16;

/// Default idle time before a session expires
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

/// Default cap on live sessions
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

// ============================================================================
// Document
// ============================================================================

/// What makes two uploads "the same document"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdentity {
    pub file_name: String,
    pub content_hash: String,
}

impl DocumentIdentity {
    pub fn new(file_name: &str, data: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_hash: hex::encode(Sha256::digest(data)),
        }
    }
}

/// The PDF currently loaded in a session
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub identity: DocumentIdentity,
    pub text: Arc<str>,
    pub size_bytes: usize,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDocument {
    pub fn new(identity: DocumentIdentity, text: String, size_bytes: usize) -> Self {
        Self {
            identity,
            text: Arc::from(text),
            size_bytes,
            loaded_at: Utc::now(),
        }
    }

    /// File name without its `.pdf` extension, for download names
    pub fn stem(&self) -> &str {
        let name = &self.identity.file_name;
        let split = name.len().checked_sub(4).and_then(|i| Some((i, name.get(i..)?)));
        match split {
            Some((i, ext)) if ext.eq_ignore_ascii_case(".pdf") => &name[..i],
            _ => name,
        }
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            file_name: self.identity.file_name.clone(),
            content_hash: self.identity.content_hash.clone(),
            size_bytes: self.size_bytes,
            char_count: self.text.chars().count(),
            loaded_at: self.loaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub file_name: String,
    pub content_hash: String,
    pub size_bytes: usize,
    pub char_count: usize,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// Artifacts
// ============================================================================

/// Cached text statistics and the configuration they recommend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    pub analysis: TextAnalysis,
    pub recommended: MindmapConfig,
}

impl AnalysisArtifact {
    pub fn compute(text: &str) -> Self {
        let analysis = TextAnalysis::analyze(text);
        let recommended = MindmapConfig::from_score(analysis.complexity_score);
        Self {
            analysis,
            recommended,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapArtifact {
    pub markdown: String,
    pub config: MindmapConfig,
    pub generated_at: DateTime<Utc>,
}

/// A flashcard deck together with the card count it was requested with
#[derive(Debug, Clone)]
pub struct DeckArtifact {
    pub requested: usize,
    pub deck: FlashcardDeck,
}

/// A quiz together with the options it was requested with
#[derive(Debug, Clone)]
pub struct QuizArtifact {
    pub requested: usize,
    pub difficulty: Difficulty,
    pub quiz: QuizSession,
}

/// Summaries are cached per requested length and document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub target_words: usize,
    pub content_hash: String,
}

// ============================================================================
// Session
// ============================================================================

pub struct StudySession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub document: Option<LoadedDocument>,
    pub analysis: Option<AnalysisArtifact>,
    pub mindmap: Option<MindmapArtifact>,
    pub summaries: LruCache<SummaryKey, Summary>,
    pub current_summary: Option<SummaryKey>,
    pub flashcards: Option<DeckArtifact>,
    pub quiz: Option<QuizArtifact>,
}

impl StudySession {
    pub fn new() -> Self {
        let now = Utc::now();
        let capacity = NonZeroUsize::new(SUMMARY_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_accessed: now,
            document: None,
            analysis: None,
            mindmap: None,
            summaries: LruCache::new(capacity),
            current_summary: None,
            flashcards: None,
            quiz: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }

    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.last_accessed + ttl
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.expires_at(ttl) < Utc::now()
    }

    pub fn document_identity(&self) -> Option<&DocumentIdentity> {
        self.document.as_ref().map(|d| &d.identity)
    }

    /// Drop everything derived from the loaded document
    pub fn clear_artifacts(&mut self) {
        self.analysis = None;
        self.mindmap = None;
        self.summaries.clear();
        self.current_summary = None;
        self.flashcards = None;
        self.quiz = None;
    }

    /// The summary most recently generated or selected
    pub fn current_summary(&mut self) -> Option<&Summary> {
        let key = self.current_summary.clone()?;
        self.summaries.get(&key)
    }

    pub fn info(&self, ttl: Duration) -> SessionInfo {
        SessionInfo {
            id: self.id,
            created_at: self.created_at,
            expires_at: self.expires_at(ttl),
            document: self.document.as_ref().map(LoadedDocument::info),
            artifacts: ArtifactStatus {
                analysis: self.analysis.is_some(),
                mindmap: self.mindmap.is_some(),
                summaries: self.summaries.len(),
                flashcards: self.flashcards.as_ref().map_or(0, |a| a.deck.len()),
                quiz_questions: self.quiz.as_ref().map_or(0, |a| a.quiz.len()),
            },
        }
    }
}

impl Default for StudySession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactStatus {
    pub analysis: bool,
    pub mindmap: bool,
    pub summaries: usize,
    pub flashcards: usize,
    pub quiz_questions: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentInfo>,
    pub artifacts: ArtifactStatus,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session expired: {0}")]
    Expired(String),

    #[error("Too many active sessions (max: {0})")]
    TooManySessions(usize),

    #[error("No document loaded; upload a PDF first")]
    NoDocument,

    #[error("The loaded document changed while the request was running")]
    DocumentChanged,

    #[error("No {0} generated yet")]
    NotGenerated(&'static str),
}

impl SessionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotFound(_) | Self::NotGenerated(_) => StatusCode::NOT_FOUND,
            Self::Expired(_) => StatusCode::GONE,
            Self::TooManySessions(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NoDocument | Self::DocumentChanged => StatusCode::CONFLICT,
        }
    }
}
