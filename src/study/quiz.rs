//! Quiz taking state
//!
//! Answers can be changed freely until the quiz is submitted. Submission
//! requires every question to be answered; afterwards the quiz is read-only
//! until it is retaken.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ai::{Choice, QuizQuestion};

use super::StudyError;

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    answers: BTreeMap<usize, Choice>,
    submitted: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            submitted: false,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    fn check_index(&self, index: usize) -> Result<(), StudyError> {
        if index >= self.questions.len() {
            return Err(StudyError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        Ok(())
    }

    /// Record (or change) the answer to a question
    pub fn answer(&mut self, index: usize, choice: Choice) -> Result<(), StudyError> {
        if self.submitted {
            return Err(StudyError::AlreadySubmitted);
        }
        self.check_index(index)?;
        self.answers.insert(index, choice);
        Ok(())
    }

    pub fn goto(&mut self, index: usize) -> Result<(), StudyError> {
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Lock in the answers and grade the quiz
    pub fn submit(&mut self) -> Result<QuizResults, StudyError> {
        if self.submitted {
            return Err(StudyError::AlreadySubmitted);
        }
        if self.answers.len() < self.questions.len() {
            return Err(StudyError::Incomplete {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }

        self.submitted = true;
        self.results()
    }

    /// Graded results of a submitted quiz
    pub fn results(&self) -> Result<QuizResults, StudyError> {
        if !self.submitted {
            return Err(StudyError::NotSubmitted);
        }

        let questions: Vec<QuestionResult> = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let user_answer = self.answers.get(&i).copied();
                QuestionResult {
                    number: i + 1,
                    question: q.question.clone(),
                    user_answer,
                    correct_answer: q.correct,
                    is_correct: user_answer == Some(q.correct),
                    explanation: q.explanation.clone(),
                }
            })
            .collect();

        let score = questions.iter().filter(|r| r.is_correct).count();
        let total = questions.len();
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };

        Ok(QuizResults {
            score,
            total,
            percentage,
            grade: Grade::from_percentage(percentage),
            questions,
        })
    }

    /// Clear answers and start over with the same questions
    pub fn retake(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.submitted = false;
    }

    /// Current question without revealing the correct answer
    pub fn view(&self) -> QuizView {
        let question = self.questions.get(self.current).map(|q| QuestionView {
            number: self.current + 1,
            question: q.question.clone(),
            options: q.options.clone(),
            selected: self.answers.get(&self.current).copied(),
        });

        QuizView {
            total: self.questions.len(),
            answered: self.answers.len(),
            submitted: self.submitted,
            can_submit: !self.submitted && self.answers.len() == self.questions.len(),
            current: question,
        }
    }
}

/// Performance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Grade {
    Excellent,
    Good,
    KeepStudying,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Excellent
        } else if percentage >= 60.0 {
            Self::Good
        } else {
            Self::KeepStudying
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent!",
            Self::Good => "Good job!",
            Self::KeepStudying => "Keep studying!",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub number: usize,
    pub question: String,
    pub user_answer: Option<Choice>,
    pub correct_answer: Choice,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub grade: Grade,
    pub questions: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub number: usize,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<Choice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub total: usize,
    pub answered: usize,
    pub submitted: bool,
    pub can_submit: bool,
    pub current: Option<QuestionView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: Choice) -> QuizQuestion {
        QuizQuestion {
            question: "q".to_string(),
            options: vec![
                "A) a".to_string(),
                "B) b".to_string(),
                "C) c".to_string(),
                "D) d".to_string(),
            ],
            correct,
            explanation: "because".to_string(),
        }
    }

    fn quiz() -> QuizSession {
        QuizSession::new(vec![
            question(Choice::A),
            question(Choice::B),
            question(Choice::C),
            question(Choice::D),
            question(Choice::A),
        ])
    }

    #[test]
    fn test_submit_requires_all_answers() {
        let mut quiz = quiz();
        quiz.answer(0, Choice::A).unwrap();

        assert_eq!(
            quiz.submit().unwrap_err(),
            StudyError::Incomplete { answered: 1, total: 5 }
        );
        assert!(!quiz.is_submitted());
    }

    #[test]
    fn test_scoring_and_grade() {
        let mut quiz = quiz();
        let picks = [Choice::A, Choice::B, Choice::C, Choice::A, Choice::B];
        for (i, pick) in picks.into_iter().enumerate() {
            quiz.answer(i, pick).unwrap();
        }

        let results = quiz.submit().unwrap();
        assert_eq!(results.score, 3);
        assert_eq!(results.total, 5);
        assert!((results.percentage - 60.0).abs() < 1e-9);
        assert_eq!(results.grade, Grade::Good);
        assert!(!results.questions[3].is_correct);
        assert_eq!(results.questions[3].correct_answer, Choice::D);
    }

    #[test]
    fn test_answers_locked_after_submit() {
        let mut quiz = QuizSession::new(vec![question(Choice::A)]);
        quiz.answer(0, Choice::A).unwrap();
        quiz.submit().unwrap();

        assert_eq!(quiz.answer(0, Choice::B), Err(StudyError::AlreadySubmitted));
        assert_eq!(quiz.submit().unwrap_err(), StudyError::AlreadySubmitted);
    }

    #[test]
    fn test_retake_resets() {
        let mut quiz = QuizSession::new(vec![question(Choice::A), question(Choice::B)]);
        quiz.answer(0, Choice::A).unwrap();
        quiz.answer(1, Choice::B).unwrap();
        quiz.next();
        quiz.submit().unwrap();

        quiz.retake();
        assert_eq!(quiz.answered_count(), 0);
        assert_eq!(quiz.current_index(), 0);
        assert_eq!(quiz.results().unwrap_err(), StudyError::NotSubmitted);
    }

    #[test]
    fn test_out_of_range() {
        let mut quiz = quiz();
        assert_eq!(
            quiz.answer(9, Choice::A),
            Err(StudyError::IndexOutOfRange { index: 9, len: 5 })
        );
        assert!(quiz.goto(5).is_err());
        assert!(quiz.goto(4).is_ok());
    }

    #[test]
    fn test_view_hides_correct_answer() {
        let mut quiz = quiz();
        quiz.answer(0, Choice::C).unwrap();
        let json = serde_json::to_value(quiz.view()).unwrap();

        assert_eq!(json["current"]["selected"], "C");
        assert!(json["current"].get("correct").is_none());
        assert_eq!(json["canSubmit"], false);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::from_percentage(80.0), Grade::Excellent);
        assert_eq!(Grade::from_percentage(79.9), Grade::Good);
        assert_eq!(Grade::from_percentage(59.9), Grade::KeepStudying);
    }
}
