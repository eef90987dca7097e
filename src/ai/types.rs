//! Generation Types
//!
//! Study artifacts produced by the model and the errors that can occur while
//! producing them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A question/answer study card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// Multiple-choice option letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Choice {
    type Err = String;

    /// Accepts "B", "b", "B)", "B) text" and similar
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .chars()
            .next()
            .and_then(Self::from_letter)
            .ok_or_else(|| format!("'{}' is not one of A, B, C, D", s.trim()))
    }
}

/// A multiple-choice quiz question with four options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    /// Option lines as produced by the model, e.g. "A) Paris"
    pub options: Vec<String>,
    pub correct: Choice,
    pub explanation: String,
}

/// Quiz difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// A generated summary together with its length bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: String,
    pub actual_word_count: usize,
    pub target_word_count: usize,
}

impl Summary {
    pub fn new(summary: String, target_word_count: usize) -> Self {
        let actual_word_count = summary.split_whitespace().count();
        Self {
            summary,
            actual_word_count,
            target_word_count,
        }
    }

    /// Whether the actual length lies within `tolerance` (a fraction) of the target
    pub fn within_tolerance(&self, tolerance: f64) -> bool {
        let target = self.target_word_count as f64;
        let actual = self.actual_word_count as f64;
        (actual - target).abs() <= target * tolerance
    }
}

/// Errors from the generative AI delegate
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("Failed to reach the AI service: {0}")]
    Request(String),

    #[error("AI service timed out after {0} seconds")]
    Timeout(u64),

    #[error("AI service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Prompt was blocked by the AI service: {0}")]
    Blocked(String),

    #[error("Received empty response from the AI service")]
    EmptyResponse,

    #[error("Could not parse the AI response: {0}")]
    Unparseable(String),
}

impl GenerationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Api { status: 429, .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Blocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
