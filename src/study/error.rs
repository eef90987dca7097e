//! Study state errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudyError {
    #[error("Flip the card before marking it")]
    AnswerHidden,

    #[error("Index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Quiz already submitted; retake it to answer again")]
    AlreadySubmitted,

    #[error("Quiz incomplete: {answered}/{total} questions answered")]
    Incomplete { answered: usize, total: usize },

    #[error("Quiz has not been submitted yet")]
    NotSubmitted,
}

impl StudyError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::CONFLICT,
        }
    }
}
