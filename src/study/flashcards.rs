//! Flashcard practice state
//!
//! A deck walks through its cards one at a time. The answer side has to be
//! shown before a card can be marked right or wrong; marking moves on to the
//! next card unless the deck is already on its last one.

use serde::{Deserialize, Serialize};

use crate::ai::Flashcard;

use super::StudyError;

/// Right/wrong tally for a practice run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeckStats {
    pub correct: u32,
    pub incorrect: u32,
}

impl DeckStats {
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Percentage of correct marks, if anything was marked
    pub fn accuracy(&self) -> Option<f64> {
        let answered = self.answered();
        (answered > 0).then(|| self.correct as f64 / answered as f64 * 100.0)
    }
}

/// User action on a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckAction {
    Flip,
    Next,
    Previous,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    current: usize,
    show_answer: bool,
    stats: DeckStats,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            current: 0,
            show_answer: false,
            stats: DeckStats::default(),
        }
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.cards.get(self.current)
    }

    pub fn is_answer_shown(&self) -> bool {
        self.show_answer
    }

    pub fn stats(&self) -> DeckStats {
        self.stats
    }

    fn is_last(&self) -> bool {
        self.current + 1 >= self.cards.len()
    }

    pub fn flip(&mut self) {
        self.show_answer = !self.show_answer;
    }

    pub fn next(&mut self) {
        if !self.is_last() {
            self.current += 1;
            self.show_answer = false;
        }
    }

    pub fn previous(&mut self) {
        if self.current > 0 {
            self.current -= 1;
            self.show_answer = false;
        }
    }

    /// Record whether the user knew the current card
    pub fn mark(&mut self, correct: bool) -> Result<(), StudyError> {
        if !self.show_answer {
            return Err(StudyError::AnswerHidden);
        }

        if correct {
            self.stats.correct += 1;
        } else {
            self.stats.incorrect += 1;
        }
        self.next();
        Ok(())
    }

    pub fn apply(&mut self, action: DeckAction) -> Result<(), StudyError> {
        match action {
            DeckAction::Flip => self.flip(),
            DeckAction::Next => self.next(),
            DeckAction::Previous => self.previous(),
            DeckAction::Correct => self.mark(true)?,
            DeckAction::Incorrect => self.mark(false)?,
        }
        Ok(())
    }

    /// Snapshot of what the user currently sees
    pub fn view(&self) -> DeckView {
        let card = self.current_card();
        let (side, text) = match (card, self.show_answer) {
            (Some(card), true) => ("answer", card.answer.clone()),
            (Some(card), false) => ("question", card.question.clone()),
            (None, _) => ("question", String::new()),
        };

        DeckView {
            position: self.current + 1,
            total: self.cards.len(),
            side,
            text,
            show_answer: self.show_answer,
            stats: self.stats,
            accuracy: self.stats.accuracy(),
        }
    }
}

/// Serializable deck snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckView {
    /// 1-based card position
    pub position: usize,
    pub total: usize,
    pub side: &'static str,
    pub text: String,
    pub show_answer: bool,
    pub stats: DeckStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> FlashcardDeck {
        FlashcardDeck::new(
            (0..n)
                .map(|i| Flashcard {
                    question: format!("q{i}"),
                    answer: format!("a{i}"),
                })
                .collect(),
        )
    }

    #[test]
    fn test_flip_shows_answer() {
        let mut deck = deck(2);
        assert_eq!(deck.view().text, "q0");

        deck.flip();
        let view = deck.view();
        assert_eq!(view.side, "answer");
        assert_eq!(view.text, "a0");
    }

    #[test]
    fn test_mark_requires_answer() {
        let mut deck = deck(2);
        assert_eq!(deck.mark(true), Err(StudyError::AnswerHidden));
        assert_eq!(deck.stats().answered(), 0);
    }

    #[test]
    fn test_mark_advances_and_hides() {
        let mut deck = deck(3);
        deck.apply(DeckAction::Flip).unwrap();
        deck.apply(DeckAction::Correct).unwrap();

        assert_eq!(deck.current_index(), 1);
        assert!(!deck.is_answer_shown());
        assert_eq!(deck.stats().correct, 1);
    }

    #[test]
    fn test_mark_on_last_card_stays() {
        let mut deck = deck(1);
        deck.flip();
        deck.mark(false).unwrap();

        assert_eq!(deck.current_index(), 0);
        assert!(deck.is_answer_shown());
        assert_eq!(deck.stats().incorrect, 1);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut deck = deck(2);
        deck.previous();
        assert_eq!(deck.current_index(), 0);

        deck.next();
        deck.next();
        assert_eq!(deck.current_index(), 1);

        deck.flip();
        deck.previous();
        assert_eq!(deck.current_index(), 0);
        assert!(!deck.is_answer_shown());
    }

    #[test]
    fn test_accuracy() {
        let mut deck = deck(4);
        assert_eq!(deck.view().accuracy, None);

        for correct in [true, true, false] {
            deck.flip();
            deck.mark(correct).unwrap();
        }

        let accuracy = deck.stats().accuracy().unwrap();
        assert!((accuracy - 66.666).abs() < 0.01);
    }
}
