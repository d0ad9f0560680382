use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{GameAggregate, GameKind, PlayerAggregate, ScoreRecord};

/// One leaderboard/recent-scores row, with the player id resolved to a name
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub game: GameKind,
    pub score: i32,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
    pub is_personal_best: bool,
}

impl ScoreEntry {
    pub fn from_record(record: ScoreRecord, player_name: String) -> Self {
        Self {
            player_name,
            game: record.game,
            score: record.score,
            attempts: record.attempts,
            created_at: record.created_at,
            is_personal_best: record.is_personal_best,
        }
    }
}

/// Query parameters for the leaderboard endpoint
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub game: GameKind,
    pub limit: Option<i64>,
}

/// Response for GET /api/players/{name}/stats
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerStatsResponse {
    pub player_name: String,
    pub total_games: i64,
    pub total_score: i64,
    pub highest_score: i32,
    pub last_played: DateTime<Utc>,
}

impl PlayerStatsResponse {
    pub fn from_aggregate(aggregate: PlayerAggregate, player_name: String) -> Self {
        Self {
            player_name,
            total_games: aggregate.total_games,
            total_score: aggregate.total_score,
            highest_score: aggregate.highest_score,
            last_played: aggregate.last_played,
        }
    }
}

/// Response for GET /api/games/{game}/stats
#[derive(Debug, Serialize, Deserialize)]
pub struct GameStatsResponse {
    pub game: GameKind,
    pub play_count: i64,
    pub average_score: f64,
}

impl From<GameAggregate> for GameStatsResponse {
    fn from(aggregate: GameAggregate) -> Self {
        Self {
            game: aggregate.game,
            play_count: aggregate.play_count,
            average_score: aggregate.average_score,
        }
    }
}
