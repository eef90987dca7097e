//! Study Generator
//!
//! Orchestrates prompts, provider calls and response parsing for every
//! study artifact.

use std::sync::Arc;

use crate::analysis::{chunk_text, MindmapConfig, TextAnalysis};

use super::{
    parse::{parse_flashcards, parse_quiz, strip_code_fence},
    prompts,
    provider::GenerativeProvider,
    types::{Difficulty, Flashcard, GenerationError, QuizQuestion, Summary},
};

/// Produces study artifacts from document text
#[derive(Clone)]
pub struct StudyGenerator {
    provider: Arc<dyn GenerativeProvider>,
    chunk_size: usize,
}

impl StudyGenerator {
    pub fn new(provider: Arc<dyn GenerativeProvider>, chunk_size: usize) -> Self {
        Self {
            provider,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// One provider round-trip; blank replies are errors
    async fn ask(&self, prompt: &str) -> Result<String, GenerationError> {
        let reply = self.provider.generate(prompt).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(reply.to_string())
    }

    /// Ask for an outline; a reply that is only an empty code fence is blank too
    async fn ask_outline(&self, prompt: &str) -> Result<String, GenerationError> {
        let reply = self.ask(prompt).await?;
        let outline = strip_code_fence(&reply);
        if outline.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(outline.to_string())
    }

    /// Generate a markdown mindmap outline
    ///
    /// Text larger than the chunk size is mapped chunk by chunk and the
    /// partial outlines are merged with a consolidation prompt.
    pub async fn mindmap(
        &self,
        text: &str,
        analysis: &TextAnalysis,
        config: &MindmapConfig,
    ) -> Result<String, GenerationError> {
        let chunks = chunk_text(text, self.chunk_size);

        if chunks.len() == 1 {
            return self.ask_outline(&prompts::mindmap_prompt(analysis, config, &chunks[0])).await;
        }

        tracing::info!(
            chunks = chunks.len(),
            detail_level = config.detail_level.as_str(),
            "Text split into chunks for mindmap generation"
        );

        let mut sections = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            match self.ask_outline(&prompts::mindmap_prompt(analysis, config, chunk)).await {
                Ok(outline) => sections.push(outline),
                Err(GenerationError::EmptyResponse) => {
                    tracing::warn!(chunk = i + 1, "Empty mindmap for chunk, skipping");
                }
                Err(e) => return Err(e),
            }
            tracing::debug!(done = i + 1, total = chunks.len(), "Mindmap chunk processed");
        }

        if sections.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        self.ask_outline(&prompts::consolidation_prompt(config, &sections)).await
    }

    /// Summarize in roughly `target_words` words
    pub async fn summary(&self, text: &str, target_words: usize) -> Result<Summary, GenerationError> {
        let reply = self.ask(&prompts::summary_prompt(text, target_words)).await?;
        Ok(Summary::new(reply, target_words))
    }

    /// Generate up to `count` flashcards
    pub async fn flashcards(&self, text: &str, count: usize) -> Result<Vec<Flashcard>, GenerationError> {
        let reply = self.ask(&prompts::flashcards_prompt(text, count)).await?;

        let mut cards = parse_flashcards(&reply);
        if cards.is_empty() {
            return Err(GenerationError::Unparseable(
                "no flashcards found in response".to_string(),
            ));
        }
        cards.truncate(count);
        Ok(cards)
    }

    /// Generate up to `count` multiple-choice questions
    pub async fn quiz(
        &self,
        text: &str,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<QuizQuestion>, GenerationError> {
        let reply = self.ask(&prompts::quiz_prompt(text, count, difficulty)).await?;

        let mut questions = parse_quiz(&reply);
        if questions.is_empty() {
            return Err(GenerationError::Unparseable(
                "no quiz questions found in response".to_string(),
            ));
        }
        questions.truncate(count);
        Ok(questions)
    }
}
