//! Response parsers
//!
//! The model answers in the loose line-oriented formats requested by
//! `prompts`. Blocks that do not carry every required field are dropped.

use super::types::{Choice, Flashcard, QuizQuestion};

/// Parse `CARD X: / Q: / A:` blocks
pub fn parse_flashcards(response: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();

    for block in response.split("CARD").skip(1) {
        let mut question = "";
        let mut answer = "";

        for line in block.trim().lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("Q:") {
                question = rest.trim();
            } else if let Some(rest) = line.strip_prefix("A:") {
                answer = rest.trim();
            }
        }

        if !question.is_empty() && !answer.is_empty() {
            cards.push(Flashcard {
                question: question.to_string(),
                answer: answer.to_string(),
            });
        }
    }

    cards
}

/// Parse `QUESTION X:` blocks with four lettered options
pub fn parse_quiz(response: &str) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();

    for block in response.split("QUESTION").skip(1) {
        let mut question = "";
        let mut options = Vec::new();
        let mut correct = "";
        let mut explanation = "";

        for line in block.trim().lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(rest) = line.strip_prefix("Q:") {
                question = rest.trim();
            } else if ["A)", "B)", "C)", "D)"].iter().any(|p| line.starts_with(p)) {
                options.push(line.to_string());
            } else if let Some(rest) = line.strip_prefix("CORRECT:") {
                correct = rest.trim();
            } else if let Some(rest) = line.strip_prefix("EXPLANATION:") {
                explanation = rest.trim();
            }
        }

        if question.is_empty() || options.len() != 4 {
            continue;
        }

        let correct = match correct.parse::<Choice>() {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!(question = %question, "Dropping quiz question: {}", e);
                continue;
            }
        };

        questions.push(QuizQuestion {
            question: question.to_string(),
            options,
            correct,
            explanation: explanation.to_string(),
        });
    }

    questions
}

/// Strip a surrounding ```markdown fence if the model added one
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("markdown", "md", ...) on the opening line
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}
