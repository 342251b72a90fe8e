use crate::model::{Choice, Question};
use thiserror::Error;

/// Failures surfaced by the poll operations.
#[derive(Debug, Error)]
pub enum PollError {
    /// Unknown question, or one that is not eligible for display. Callers
    /// cannot tell the two apart.
    #[error("not found")]
    NotFound,
    /// A vote that did not name one of the question's choices. Carries what
    /// is needed to show the voting form again.
    #[error("{message}")]
    Validation {
        question: Question,
        choices: Vec<Choice>,
        message: &'static str,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

pub type PollResult<T> = Result<T, PollError>;
