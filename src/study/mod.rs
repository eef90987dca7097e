//! Interactive study state: flashcard practice and quiz taking.

mod error;
mod flashcards;
mod quiz;

pub use error::StudyError;
pub use flashcards::{DeckAction, DeckStats, DeckView, FlashcardDeck};
pub use quiz::{Grade, QuestionResult, QuestionView, QuizResults, QuizSession, QuizView};
