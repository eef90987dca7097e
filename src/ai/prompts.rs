//! Prompt builders
//!
//! Every artifact is produced from a single free-text prompt. The response
//! formats requested here are what `parse` expects back.

use crate::analysis::{DetailLevel, MindmapConfig, TextAnalysis};

use super::types::Difficulty;

const MINDMAP_FORMAT_EXAMPLE: &str = "\
Format the output exactly like this structure:
# Main Topic 1
## Subtopic 1.1
### Detail 1.1.1
- Key point 1
- Key point 2
#### Sub-detail (if needed for complex content)
- Specific information
### Detail 1.1.2
## Subtopic 1.2
# Main Topic 2
";

fn mindmap_focus(level: DetailLevel) -> &'static str {
    match level {
        DetailLevel::Basic => "\
Focus on:
- 3-5 main topics maximum
- Key concepts and definitions
- Essential relationships
- Keep it concise and clear
",
        DetailLevel::Moderate => "\
Focus on:
- 4-7 main topics
- Important subtopics with explanations
- Key examples and details
- Connections between concepts
- Supporting evidence or data points
",
        DetailLevel::Detailed => "\
Focus on:
- 6-10 main topics
- Comprehensive subtopic breakdown
- Specific examples, case studies, or applications
- Detailed explanations and context
- Cross-references and relationships
- Important quotes or key points
",
        DetailLevel::Comprehensive => "\
Focus on:
- Comprehensive topic coverage (8-15 main topics)
- Extensive subtopic hierarchy
- Detailed examples, case studies, and applications
- In-depth explanations with context
- Multiple perspectives or viewpoints
- Supporting data, statistics, or evidence
- Cross-references and complex relationships
- Key quotes, definitions, and terminology
",
    }
}

/// Mindmap prompt adapted to the document's size and the chosen detail level
pub fn mindmap_prompt(analysis: &TextAnalysis, config: &MindmapConfig, text: &str) -> String {
    format!(
        "Create a hierarchical markdown mindmap from the following text with {detail} level of detail.\n\
         Use up to {levels} levels of hierarchy (# for main topics, ## for subtopics, ### for sub-subtopics, etc.).\n\
         \n\
         Based on the text complexity:\n\
         - Word count: {words}\n\
         - Estimated sections: {sections}\n\
         \n\
         {focus}\n\
         {example}\n\
         \n\
         Text to analyze: {text}\n\
         \n\
         Respond only with the markdown mindmap, no additional text.",
        detail = config.detail_level.as_str(),
        levels = config.max_levels,
        words = analysis.word_count,
        sections = analysis.paragraph_count,
        focus = mindmap_focus(config.detail_level),
        example = MINDMAP_FORMAT_EXAMPLE,
    )
}

/// Merge per-chunk mindmaps into one outline
pub fn consolidation_prompt(config: &MindmapConfig, sections: &[String]) -> String {
    format!(
        "Consolidate the following mindmap sections into a single, coherent hierarchical mindmap.\n\
         Remove duplicates, organize related topics together, and maintain the hierarchical structure.\n\
         Keep the detail level as {detail} with up to {levels} levels.\n\
         \n\
         Mindmap sections to consolidate:\n\
         {sections}\n\
         \n\
         Respond only with the consolidated markdown mindmap.",
        detail = config.detail_level.as_str(),
        levels = config.max_levels,
        sections = sections.join("\n\n"),
    )
}

/// Adjective describing the requested summary length
pub fn summary_kind(target_words: usize) -> &'static str {
    match target_words {
        0..=99 => "concise",
        100..=299 => "brief",
        300..=599 => "moderate",
        _ => "detailed",
    }
}

pub fn summary_prompt(text: &str, target_words: usize) -> String {
    format!(
        "Create a {kind} summary of the following text in approximately {target_words} words.\n\
         \n\
         Guidelines:\n\
         - Capture the main ideas and key points\n\
         - Maintain logical flow and structure\n\
         - Include important details, examples, or data as space allows\n\
         - Use clear, concise language\n\
         - Ensure the summary is self-contained and informative\n\
         \n\
         Target word count: {target_words} words\n\
         \n\
         Text to summarize: {text}",
        kind = summary_kind(target_words),
    )
}

pub fn flashcards_prompt(text: &str, count: usize) -> String {
    format!(
        "Create {count} high-quality flashcards from the following text.\n\
         Focus on key concepts, definitions, important facts, and relationships.\n\
         \n\
         Format each flashcard as:\n\
         CARD X:\n\
         Q: [Question]\n\
         A: [Answer]\n\
         \n\
         Make questions clear and specific. Keep answers concise but complete.\n\
         Cover the most important topics from the text.\n\
         \n\
         Text: {text}"
    )
}

fn difficulty_instructions(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => {
            "Focus on basic facts, definitions, and main concepts. Make questions straightforward."
        }
        Difficulty::Medium => {
            "Include analytical questions, relationships between concepts, and some application-based questions."
        }
        Difficulty::Hard => {
            "Create challenging questions requiring critical thinking, analysis, and application of concepts."
        }
    }
}

pub fn quiz_prompt(text: &str, count: usize, difficulty: Difficulty) -> String {
    format!(
        "Create {count} multiple-choice quiz questions from the following text.\n\
         Difficulty level: {level}\n\
         {instructions}\n\
         \n\
         Format each question as:\n\
         QUESTION X:\n\
         Q: [Question text]\n\
         A) [Option A]\n\
         B) [Option B]\n\
         C) [Option C]\n\
         D) [Option D]\n\
         CORRECT: [A/B/C/D]\n\
         EXPLANATION: [Brief explanation of why this is correct]\n\
         \n\
         Make sure:\n\
         - Questions test understanding, not just memorization\n\
         - All options are plausible\n\
         - Cover different parts of the text\n\
         - Explanations are helpful for learning\n\
         \n\
         Text: {text}",
        level = difficulty.as_str(),
        instructions = difficulty_instructions(difficulty),
    )
}
