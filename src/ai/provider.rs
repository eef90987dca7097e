//! Generative AI Providers
//!
//! Defines the provider trait and the Google Gemini implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::GenerationError;

/// Text-in, text-out generative model
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Human readable provider name
    fn name(&self) -> &str;

    /// Send a single prompt and return the model's text
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Google Gemini `generateContent` provider
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiProvider {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GenerationError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Pull the text out of a `generateContent` response body
///
/// Only the first candidate is used; all of its text parts are concatenated.
fn response_text(response: GeminiResponse) -> Result<String, GenerationError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(reason) = candidate.finish_reason.filter(|r| r == "SAFETY") {
            return Err(GenerationError::Blocked(reason));
        }
        return Err(GenerationError::EmptyResponse);
    }

    Ok(text)
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GeminiRequest {
            contents: [GeminiContent {
                role: "user",
                parts: [GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.request_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else {
                    // without_url keeps the API key out of the message
                    GenerationError::Request(e.without_url().to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Unparseable(format!("Failed to parse response: {}", e.without_url())))?;

        let text = response_text(parsed)?;

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            response_chars = text.len(),
            "Gemini generation complete"
        );

        Ok(text)
    }
}

/// Scripted provider for tests: replies are returned in order, the last one repeats
#[cfg(test)]
pub struct MockProvider {
    replies: std::sync::Mutex<std::collections::VecDeque<Result<String, GenerationError>>>,
    last: String,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        let last = replies.last().map(|s| s.to_string()).unwrap_or_default();
        Self {
            replies: std::sync::Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            last,
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            replies: std::sync::Mutex::new(std::iter::once(Err(error)).collect()),
            last: String::new(),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl GenerativeProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(reply) => reply,
            None if self.last.is_empty() => Err(GenerationError::EmptyResponse),
            None => Ok(self.last.clone()),
        }
    }
}
