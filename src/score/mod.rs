// Public API - what other modules can use
pub use errors::ScoreError;
pub use models::{GameAggregate, GameKind, PlayerAggregate, ScoreRecord};
pub use repository::{InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository};
pub use service::ScoreService;

// Internal modules
mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
