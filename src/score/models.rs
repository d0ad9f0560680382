use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// The games the server knows how to score. The string form doubles as the
/// wire and database representation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameKind {
    NumberGuess,
    TicTacToe,
    RockPaperScissors,
}

/// One completed round's result, append-only once written.
///
/// The only field that may change after the fact is `is_personal_best`,
/// which a later higher-scoring record for the same (player, game) pair
/// demotes to false.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: String, // UUID v4 as string
    pub player_id: String,
    #[sqlx(try_from = "String")]
    pub game: GameKind,
    pub score: i32,
    pub attempts: i32,
    pub duration_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub is_personal_best: bool,
}

impl ScoreRecord {
    pub fn new(
        player_id: String,
        game: GameKind,
        score: i32,
        attempts: i32,
        duration_ms: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_id,
            game,
            score,
            attempts,
            duration_ms,
            created_at: Utc::now(),
            is_personal_best: false,
        }
    }
}

impl TryFrom<String> for GameKind {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Derived per-player summary, recomputed from the full record set on every
/// ledger write. Never hand-edited.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub player_id: String,
    pub total_games: i64,
    pub total_score: i64,
    pub highest_score: i32,
    pub last_played: DateTime<Utc>,
}

/// Derived per-game summary, same derivation rule scoped to a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAggregate {
    pub game: GameKind,
    pub play_count: i64,
    pub average_score: f64,
}
