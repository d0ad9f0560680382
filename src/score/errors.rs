use thiserror::Error;

use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Write conflict on ({player_id}, {game})")]
    Conflict { player_id: String, game: String },

    #[error("Unknown record: {0}")]
    UnknownRecord(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ScoreError> for AppError {
    fn from(error: ScoreError) -> Self {
        match error {
            ScoreError::Conflict { .. } => AppError::Conflict(error.to_string()),
            ScoreError::UnknownRecord(msg) => AppError::NotFound(msg),
            ScoreError::Validation(msg) => AppError::InvalidInput(msg),
            ScoreError::Repository(msg) => AppError::DatabaseError(msg),
        }
    }
}
