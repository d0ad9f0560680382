use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::player::repository::PlayerRepository;
use crate::round::store::RoundStore;
use crate::score::ScoreService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    pub round_store: Arc<dyn RoundStore + Send + Sync>,
    pub score_service: Arc<ScoreService>,
}

impl AppState {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        round_store: Arc<dyn RoundStore + Send + Sync>,
        score_service: Arc<ScoreService>,
    ) -> Self {
        Self {
            player_repository,
            round_store,
            score_service,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::player::repository::InMemoryPlayerRepository;
    use crate::round::store::InMemoryRoundStore;
    use crate::score::{InMemoryScoreRepository, ScoreRepository};

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        player_repository: Option<Arc<dyn PlayerRepository + Send + Sync>>,
        round_store: Option<Arc<dyn RoundStore + Send + Sync>>,
        score_repository: Option<Arc<dyn ScoreRepository + Send + Sync>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                player_repository: None,
                round_store: None,
                score_repository: None,
            }
        }

        pub fn with_player_repository(
            mut self,
            repo: Arc<dyn PlayerRepository + Send + Sync>,
        ) -> Self {
            self.player_repository = Some(repo);
            self
        }

        pub fn with_round_store(mut self, store: Arc<dyn RoundStore + Send + Sync>) -> Self {
            self.round_store = Some(store);
            self
        }

        pub fn with_score_repository(
            mut self,
            repo: Arc<dyn ScoreRepository + Send + Sync>,
        ) -> Self {
            self.score_repository = Some(repo);
            self
        }

        pub fn build(self) -> AppState {
            let score_repository = self
                .score_repository
                .unwrap_or_else(|| Arc::new(InMemoryScoreRepository::new()));
            AppState {
                player_repository: self
                    .player_repository
                    .unwrap_or_else(|| Arc::new(InMemoryPlayerRepository::new())),
                round_store: self
                    .round_store
                    .unwrap_or_else(|| Arc::new(InMemoryRoundStore::new())),
                score_service: Arc::new(ScoreService::new(score_repository)),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
