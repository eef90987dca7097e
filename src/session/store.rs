//! Session Store
//!
//! Manages study sessions with:
//! - In-memory storage behind an async `RwLock`
//! - Idle expiry with a background cleanup task
//! - Document-identity checks so late AI results never land on a newer document

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
#[cfg(test)]
use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{
    DocumentIdentity, LoadedDocument, SessionError, SessionInfo, StudySession,
    DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_MINUTES,
};

/// Outcome of loading a document into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentLoad {
    /// First document in the session
    Loaded,
    /// A different document replaced the previous one; artifacts were cleared
    Replaced,
    /// Same file and bytes as before; artifacts were kept
    Unchanged,
}

// ============================================================================
// Session Store
// ============================================================================

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    sessions: RwLock<HashMap<Uuid, StudySession>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limits(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES), DEFAULT_MAX_SESSIONS)
    }

    /// Create a store with a custom idle TTL and session cap (0 = unlimited)
    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                ttl,
                max_sessions,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    pub async fn create(&self) -> Result<SessionInfo, SessionError> {
        let mut sessions = self.inner.sessions.write().await;

        if self.inner.max_sessions > 0 && sessions.len() >= self.inner.max_sessions {
            // Make room by evicting expired sessions before refusing
            let ttl = self.inner.ttl;
            sessions.retain(|_, s| !s.is_expired(ttl));
            if sessions.len() >= self.inner.max_sessions {
                return Err(SessionError::TooManySessions(self.inner.max_sessions));
            }
        }

        let session = StudySession::new();
        let info = session.info(self.inner.ttl);
        sessions.insert(session.id, session);

        tracing::info!(session_id = %info.id, "Created study session");
        Ok(info)
    }

    pub async fn info(&self, id: Uuid) -> Result<SessionInfo, SessionError> {
        let ttl = self.inner.ttl;
        self.with_session(id, |s| Ok(s.info(ttl))).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SessionError> {
        let removed = self.inner.sessions.write().await.remove(&id);
        match removed {
            Some(_) => {
                tracing::info!(session_id = %id, "Deleted study session");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    /// Run `f` against a live session, refreshing its idle timer
    ///
    /// The lock is held for the duration of `f`; never do slow work inside it.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut StudySession) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut sessions = self.inner.sessions.write().await;

        let expired = match sessions.get(&id) {
            None => return Err(SessionError::NotFound(id.to_string())),
            Some(session) => session.is_expired(self.inner.ttl),
        };
        if expired {
            sessions.remove(&id);
            tracing::debug!(session_id = %id, "Session expired on access");
            return Err(SessionError::Expired(id.to_string()));
        }

        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        session.touch();
        f(session)
    }

    /// Like [`with_session`](Self::with_session), but only if the session
    /// still holds the document identified by `identity`
    pub async fn with_document<R>(
        &self,
        id: Uuid,
        identity: &DocumentIdentity,
        f: impl FnOnce(&mut StudySession) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        self.with_session(id, |session| {
            match session.document_identity() {
                Some(current) if current == identity => f(session),
                Some(_) => Err(SessionError::DocumentChanged),
                None => Err(SessionError::NoDocument),
            }
        })
        .await
    }

    // ========================================================================
    // Document
    // ========================================================================

    /// Whether the session already holds exactly this document
    pub async fn has_document(&self, id: Uuid, identity: &DocumentIdentity) -> Result<bool, SessionError> {
        self.with_session(id, |s| Ok(s.document_identity() == Some(identity)))
            .await
    }

    /// Load a document, clearing artifacts if it differs from the current one
    pub async fn load_document(&self, id: Uuid, document: LoadedDocument) -> Result<DocumentLoad, SessionError> {
        self.with_session(id, |session| {
            let outcome = match session.document_identity() {
                None => DocumentLoad::Loaded,
                Some(current) if *current == document.identity => return Ok(DocumentLoad::Unchanged),
                Some(_) => DocumentLoad::Replaced,
            };

            session.clear_artifacts();
            tracing::info!(
                session_id = %session.id,
                file_name = %document.identity.file_name,
                chars = document.text.len(),
                replaced = outcome == DocumentLoad::Replaced,
                "Loaded document into session"
            );
            session.document = Some(document);
            Ok(outcome)
        })
        .await
    }

    /// Snapshot the loaded document's identity and text
    pub async fn document_text(&self, id: Uuid) -> Result<(DocumentIdentity, Arc<str>), SessionError> {
        self.with_session(id, |session| {
            session
                .document
                .as_ref()
                .map(|d| (d.identity.clone(), d.text.clone()))
                .ok_or(SessionError::NoDocument)
        })
        .await
    }

    // ========================================================================
    // Query Methods
    // ========================================================================

    pub async fn session_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Remove sessions idle for longer than the TTL
    ///
    /// Returns the number of sessions removed
    pub async fn cleanup_expired(&self) -> usize {
        let ttl = self.inner.ttl;
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(ttl));
        let count = before - sessions.len();

        if count > 0 {
            tracing::info!(count = count, remaining = sessions.len(), "Cleaned up expired sessions");
        }

        count
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(self, interval_secs: u64) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));

            loop {
                interval.tick().await;
                self.cleanup_expired().await;
            }
        })
    }

    #[cfg(test)]
    pub(crate) async fn backdate(&self, id: Uuid, by: Duration) {
        if let Some(session) = self.inner.sessions.write().await.get_mut(&id) {
            session.last_accessed = Utc::now() - by;
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
