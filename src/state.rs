//! Application state management

use std::sync::Arc;

use crate::ai::{GeminiProvider, GenerationError, GenerativeProvider, StudyGenerator};
use crate::config::Config;
use crate::pdf::PdfExtractor;
use crate::session::SessionStore;

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize AI provider: {0}")]
    ProviderInit(#[from] GenerationError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    sessions: SessionStore,
    generator: StudyGenerator,
    extractor: PdfExtractor,
}

impl AppState {
    /// Create application state backed by the Gemini API
    pub fn new(config: Config) -> Result<Self, StateError> {
        let provider = GeminiProvider::new(
            &config.gemini.base_url,
            &config.gemini.model,
            &config.gemini.api_key,
            config.gemini.timeout_secs,
        )?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Create application state around any generative provider
    pub fn with_provider(config: Config, provider: Arc<dyn GenerativeProvider>) -> Self {
        let sessions = SessionStore::with_limits(
            config.session.ttl(),
            config.session.max_sessions,
        );
        let generator = StudyGenerator::new(provider, config.limits.chunk_size_chars);
        let extractor = PdfExtractor::new(config.limits.pdf_timeout_secs);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                generator,
                extractor,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get the study artifact generator
    pub fn generator(&self) -> &StudyGenerator {
        &self.inner.generator
    }

    /// Get the PDF text extractor
    pub fn extractor(&self) -> &PdfExtractor {
        &self.inner.extractor
    }
}
