use thiserror::Error;

use crate::{model::DatabaseError, quiz::source::SourceError};

pub type QuizResult<T> = std::result::Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("validation error: {0}")]
    Validation(String),
    /// Absent and not-owned attempts are indistinguishable on purpose.
    #[error("quiz attempt not found")]
    NotFound,
    #[error("quiz attempt is already completed")]
    Conflict,
    #[error("no valid questions survived validation")]
    GenerationFailure,
    #[error("question source error: {0}")]
    Source(#[from] SourceError),
    #[error("persistence error: {0}")]
    Persistence(#[from] DatabaseError),
}

impl QuizError {
    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Self::Validation(reason.into())
    }
}

impl From<sqlx::Error> for QuizError {
    fn from(value: sqlx::Error) -> Self {
        Self::Persistence(DatabaseError::SqlxError(value))
    }
}
