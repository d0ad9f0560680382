use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::models::{GameKind, ScoreRecord};
use super::types::{GameStatsResponse, LeaderboardQuery, PlayerStatsResponse, ScoreEntry};
use crate::shared::{AppError, AppState};

const RECENT_SCORES_LIMIT: i64 = 10;
const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

async fn resolve_entries(
    state: &AppState,
    records: Vec<ScoreRecord>,
) -> Result<Vec<ScoreEntry>, AppError> {
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let player_name = state
            .player_repository
            .get(&record.player_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| "unknown".to_string());
        entries.push(ScoreEntry::from_record(record, player_name));
    }
    Ok(entries)
}

/// HTTP handler for the home view's recent scores
///
/// GET /api/scores/recent
#[instrument(name = "recent_scores", skip(state))]
pub async fn recent_scores(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScoreEntry>>, AppError> {
    let records = state
        .score_service
        .recent_scores(RECENT_SCORES_LIMIT)
        .await?;

    info!(count = records.len(), "Recent scores fetched");
    Ok(Json(resolve_entries(&state, records).await?))
}

/// HTTP handler for a single game's leaderboard
///
/// GET /api/scores/leaderboard?game=tic_tac_toe&limit=10
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<ScoreEntry>>, AppError> {
    // A negative client-supplied limit would reach the database LIMIT
    // clause; clamp it so it just yields an empty page
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).max(0);
    let records = state.score_service.leaderboard(query.game, limit).await?;

    info!(game = %query.game, count = records.len(), "Leaderboard fetched");
    Ok(Json(resolve_entries(&state, records).await?))
}

/// HTTP handler for one player's aggregate statistics
///
/// GET /api/players/{name}/stats
#[instrument(name = "player_stats", skip(state))]
pub async fn player_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PlayerStatsResponse>, AppError> {
    let player = state
        .player_repository
        .get_by_name(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown player: {}", name)))?;

    let aggregate = state
        .score_service
        .player_stats(&player.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No scores recorded for player: {}", name)))?;

    Ok(Json(PlayerStatsResponse::from_aggregate(
        aggregate,
        player.name,
    )))
}

/// HTTP handler for one game's aggregate statistics
///
/// GET /api/games/{game}/stats
#[instrument(name = "game_stats", skip(state))]
pub async fn game_stats(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<GameStatsResponse>, AppError> {
    let aggregate = state
        .score_service
        .game_stats(game)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No scores recorded for game: {}", game)))?;

    Ok(Json(GameStatsResponse::from(aggregate)))
}
