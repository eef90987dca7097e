//! Generative AI Module
//!
//! Delegates summaries, flashcards, quizzes and mindmap outlines to an
//! external generative model.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use velostudy::ai::{GeminiProvider, StudyGenerator};
//!
//! let provider = GeminiProvider::new(DEFAULT_GEMINI_BASE_URL, "gemini-1.5-flash", &key, 120)?;
//! let generator = StudyGenerator::new(Arc::new(provider), 25_000);
//!
//! let summary = generator.summary(&text, 300).await?;
//! let cards = generator.flashcards(&text, 10).await?;
//! ```

mod parse;
mod prompts;
mod provider;
mod service;
mod types;

pub use parse::{parse_flashcards, parse_quiz, strip_code_fence};
pub use provider::{GeminiProvider, GenerativeProvider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
pub use service::StudyGenerator;
pub use types::{Choice, Difficulty, Flashcard, GenerationError, QuizQuestion, Summary};

#[cfg(test)]
pub(crate) use provider::MockProvider;
