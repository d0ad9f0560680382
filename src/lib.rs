// Library crate for the casual games server
// This file exposes the public API for integration tests

pub mod game;
pub mod player;
pub mod round;
pub mod score;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use game::{
    choose_opponent_move, evaluate_choice, evaluate_guess, Board, BoardOutcome, GuessHint,
    Marker, RpsChoice, RpsOutcome,
};
pub use player::{InMemoryPlayerRepository, PlayerModel, PlayerRepository};
pub use round::{GuessRound, InMemoryRoundStore, RoundStore, RpsStreak};
pub use score::{GameKind, InMemoryScoreRepository, ScoreRepository, ScoreService};
pub use shared::{AppError, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application router over the injected state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Casual games server" }))
        .route("/api/guess", post(game::handlers::number_guess))
        .route("/api/guess/reset", post(game::handlers::guess_reset))
        .route("/api/tictactoe/move", post(game::handlers::tic_tac_toe_move))
        .route("/api/rps", post(game::handlers::rps_play))
        .route("/api/rps/reset", post(game::handlers::rps_reset))
        .route("/api/scores/recent", get(score::handlers::recent_scores))
        .route("/api/scores/leaderboard", get(score::handlers::leaderboard))
        .route("/api/players/:name/stats", get(score::handlers::player_stats))
        .route("/api/games/:game/stats", get(score::handlers::game_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
