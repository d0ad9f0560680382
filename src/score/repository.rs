use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::errors::ScoreError;
use super::models::{GameAggregate, GameKind, PlayerAggregate, ScoreRecord};

/// Storage operations for the score ledger and its derived aggregates.
///
/// `commit_round` is the single write entry point and is atomic: a round
/// either lands in full (demotion, record, both aggregates) or not at all,
/// so a conflicted write can be retried without leaving partial state.
/// Ordering of writes for the same (player, game) pair is the caller's
/// concern; `ScoreService` serializes them.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Records for one (player, game) pair, oldest first
    async fn records_for_pair(
        &self,
        player_id: &str,
        game: GameKind,
    ) -> Result<Vec<ScoreRecord>, ScoreError>;

    /// Applies one completed round: demotes the named previous best (if
    /// any), appends the record, and recomputes the player and game
    /// aggregates from the stored record set
    async fn commit_round(
        &self,
        record: &ScoreRecord,
        demote_record_id: Option<&str>,
    ) -> Result<(), ScoreError>;

    async fn get_player_aggregate(
        &self,
        player_id: &str,
    ) -> Result<Option<PlayerAggregate>, ScoreError>;
    async fn get_game_aggregate(&self, game: GameKind)
        -> Result<Option<GameAggregate>, ScoreError>;

    /// Most recent scores across all games, highest score first then newest
    async fn recent_records(&self, limit: i64) -> Result<Vec<ScoreRecord>, ScoreError>;
    /// Leaderboard for one game, highest score first then newest
    async fn top_records(
        &self,
        game: GameKind,
        limit: i64,
    ) -> Result<Vec<ScoreRecord>, ScoreError>;
}

#[derive(Default)]
struct InMemoryLedger {
    records: Vec<ScoreRecord>,
    player_aggregates: HashMap<String, PlayerAggregate>,
    game_aggregates: HashMap<GameKind, GameAggregate>,
}

/// In-memory implementation of ScoreRepository for development and testing
#[derive(Default)]
pub struct InMemoryScoreRepository {
    ledger: Mutex<InMemoryLedger>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.ledger.lock().unwrap().records.len()
    }
}

fn leaderboard_order(a: &ScoreRecord, b: &ScoreRecord) -> std::cmp::Ordering {
    b.score
        .cmp(&a.score)
        .then(b.created_at.cmp(&a.created_at))
}

fn player_aggregate_of(records: &[ScoreRecord], player_id: &str) -> PlayerAggregate {
    let mine: Vec<&ScoreRecord> = records
        .iter()
        .filter(|r| r.player_id == player_id)
        .collect();
    PlayerAggregate {
        player_id: player_id.to_string(),
        total_games: mine.len() as i64,
        total_score: mine.iter().map(|r| r.score as i64).sum(),
        highest_score: mine.iter().map(|r| r.score).max().unwrap_or(0),
        last_played: mine
            .iter()
            .map(|r| r.created_at)
            .max()
            .unwrap_or_else(Utc::now),
    }
}

fn game_aggregate_of(records: &[ScoreRecord], game: GameKind) -> GameAggregate {
    let scores: Vec<i32> = records
        .iter()
        .filter(|r| r.game == game)
        .map(|r| r.score)
        .collect();
    let play_count = scores.len() as i64;
    let average_score = if play_count == 0 {
        0.0
    } else {
        scores.iter().map(|&s| s as f64).sum::<f64>() / play_count as f64
    };
    GameAggregate {
        game,
        play_count,
        average_score,
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    #[instrument(skip(self))]
    async fn records_for_pair(
        &self,
        player_id: &str,
        game: GameKind,
    ) -> Result<Vec<ScoreRecord>, ScoreError> {
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger
            .records
            .iter()
            .filter(|r| r.player_id == player_id && r.game == game)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, record))]
    async fn commit_round(
        &self,
        record: &ScoreRecord,
        demote_record_id: Option<&str>,
    ) -> Result<(), ScoreError> {
        debug!(
            record_id = %record.id,
            player_id = %record.player_id,
            game = %record.game,
            score = record.score,
            "Committing score round in memory"
        );
        let mut ledger = self.ledger.lock().unwrap();

        // The unknown-id check comes first so a failed commit appends nothing
        if let Some(record_id) = demote_record_id {
            let previous = ledger
                .records
                .iter_mut()
                .find(|r| r.id == record_id)
                .ok_or_else(|| ScoreError::UnknownRecord(record_id.to_string()))?;
            previous.is_personal_best = false;
        }
        ledger.records.push(record.clone());

        let player_aggregate = player_aggregate_of(&ledger.records, &record.player_id);
        let game_aggregate = game_aggregate_of(&ledger.records, record.game);
        ledger
            .player_aggregates
            .insert(record.player_id.clone(), player_aggregate);
        ledger.game_aggregates.insert(record.game, game_aggregate);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player_aggregate(
        &self,
        player_id: &str,
    ) -> Result<Option<PlayerAggregate>, ScoreError> {
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .player_aggregates
            .get(player_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn get_game_aggregate(
        &self,
        game: GameKind,
    ) -> Result<Option<GameAggregate>, ScoreError> {
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .game_aggregates
            .get(&game)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn recent_records(&self, limit: i64) -> Result<Vec<ScoreRecord>, ScoreError> {
        let ledger = self.ledger.lock().unwrap();
        let mut records: Vec<ScoreRecord> = ledger.records.clone();
        records.sort_by(leaderboard_order);
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn top_records(
        &self,
        game: GameKind,
        limit: i64,
    ) -> Result<Vec<ScoreRecord>, ScoreError> {
        let ledger = self.ledger.lock().unwrap();
        let mut records: Vec<ScoreRecord> = ledger
            .records
            .iter()
            .filter(|r| r.game == game)
            .cloned()
            .collect();
        records.sort_by(leaderboard_order);
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }
}

/// PostgreSQL implementation of the score repository
pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_error(error: sqlx::Error) -> ScoreError {
        // Serialization failures and deadlocks are transient; the service
        // retries them with bounded attempts
        if let sqlx::Error::Database(db_error) = &error {
            if matches!(db_error.code().as_deref(), Some("40001") | Some("40P01")) {
                return ScoreError::Conflict {
                    player_id: String::new(),
                    game: String::new(),
                };
            }
        }
        ScoreError::Repository(error.to_string())
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<ScoreRecord, ScoreError> {
        let game: String = row.get("game");
        let game = game
            .parse::<GameKind>()
            .map_err(|e| ScoreError::Repository(format!("Unknown game kind in row: {}", e)))?;
        Ok(ScoreRecord {
            id: row.get("id"),
            player_id: row.get("player_id"),
            game,
            score: row.get("score"),
            attempts: row.get("attempts"),
            duration_ms: row.get("duration_ms"),
            created_at: row.get("created_at"),
            is_personal_best: row.get("is_personal_best"),
        })
    }

    async fn fetch_records(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<ScoreRecord>, ScoreError> {
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Self::map_error)?;
        rows.iter().map(Self::row_to_record).collect()
    }
}

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    #[instrument(skip(self))]
    async fn records_for_pair(
        &self,
        player_id: &str,
        game: GameKind,
    ) -> Result<Vec<ScoreRecord>, ScoreError> {
        let query = sqlx::query(
            "SELECT id, player_id, game, score, attempts, duration_ms, created_at, is_personal_best \
             FROM score_records WHERE player_id = $1 AND game = $2 ORDER BY created_at",
        )
        .bind(player_id.to_string())
        .bind(game.to_string());
        self.fetch_records(query).await
    }

    #[instrument(skip(self, record))]
    async fn commit_round(
        &self,
        record: &ScoreRecord,
        demote_record_id: Option<&str>,
    ) -> Result<(), ScoreError> {
        debug!(
            record_id = %record.id,
            player_id = %record.player_id,
            game = %record.game,
            "Committing score round in database"
        );

        // One transaction for the whole round; a dropped tx rolls back, so
        // a serialization failure mid-sequence leaves nothing behind
        let mut tx = self.pool.begin().await.map_err(Self::map_error)?;

        if let Some(record_id) = demote_record_id {
            let result =
                sqlx::query("UPDATE score_records SET is_personal_best = FALSE WHERE id = $1")
                    .bind(record_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(Self::map_error)?;
            if result.rows_affected() == 0 {
                warn!(record_id, "Score record not found for personal-best demotion");
                return Err(ScoreError::UnknownRecord(record_id.to_string()));
            }
        }

        sqlx::query(
            "INSERT INTO score_records \
             (id, player_id, game, score, attempts, duration_ms, created_at, is_personal_best) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&record.id)
        .bind(&record.player_id)
        .bind(record.game.to_string())
        .bind(record.score)
        .bind(record.attempts)
        .bind(record.duration_ms)
        .bind(record.created_at)
        .bind(record.is_personal_best)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, record_id = %record.id, "Failed to insert score record");
            Self::map_error(e)
        })?;

        sqlx::query(
            "INSERT INTO player_aggregates \
             (player_id, total_games, total_score, highest_score, last_played) \
             SELECT player_id, COUNT(*), COALESCE(SUM(score), 0), COALESCE(MAX(score), 0), MAX(created_at) \
             FROM score_records WHERE player_id = $1 GROUP BY player_id \
             ON CONFLICT (player_id) DO UPDATE SET \
             total_games = EXCLUDED.total_games, total_score = EXCLUDED.total_score, \
             highest_score = EXCLUDED.highest_score, last_played = EXCLUDED.last_played",
        )
        .bind(&record.player_id)
        .execute(&mut *tx)
        .await
        .map_err(Self::map_error)?;

        sqlx::query(
            "INSERT INTO game_aggregates (game, play_count, average_score) \
             SELECT game, COUNT(*), AVG(score)::double precision \
             FROM score_records WHERE game = $1 GROUP BY game \
             ON CONFLICT (game) DO UPDATE SET \
             play_count = EXCLUDED.play_count, average_score = EXCLUDED.average_score",
        )
        .bind(record.game.to_string())
        .execute(&mut *tx)
        .await
        .map_err(Self::map_error)?;

        tx.commit().await.map_err(Self::map_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player_aggregate(
        &self,
        player_id: &str,
    ) -> Result<Option<PlayerAggregate>, ScoreError> {
        let row = sqlx::query(
            "SELECT player_id, total_games, total_score, highest_score, last_played \
             FROM player_aggregates WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(row.map(|row| PlayerAggregate {
            player_id: row.get("player_id"),
            total_games: row.get("total_games"),
            total_score: row.get("total_score"),
            highest_score: row.get("highest_score"),
            last_played: row.get("last_played"),
        }))
    }

    #[instrument(skip(self))]
    async fn get_game_aggregate(
        &self,
        game: GameKind,
    ) -> Result<Option<GameAggregate>, ScoreError> {
        let row = sqlx::query(
            "SELECT game, play_count, average_score FROM game_aggregates WHERE game = $1",
        )
        .bind(game.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(row.map(|row| GameAggregate {
            game,
            play_count: row.get("play_count"),
            average_score: row.get("average_score"),
        }))
    }

    #[instrument(skip(self))]
    async fn recent_records(&self, limit: i64) -> Result<Vec<ScoreRecord>, ScoreError> {
        let query = sqlx::query(
            "SELECT id, player_id, game, score, attempts, duration_ms, created_at, is_personal_best \
             FROM score_records ORDER BY score DESC, created_at DESC LIMIT $1",
        )
        .bind(limit.max(0));
        self.fetch_records(query).await
    }

    #[instrument(skip(self))]
    async fn top_records(
        &self,
        game: GameKind,
        limit: i64,
    ) -> Result<Vec<ScoreRecord>, ScoreError> {
        let query = sqlx::query(
            "SELECT id, player_id, game, score, attempts, duration_ms, created_at, is_personal_best \
             FROM score_records WHERE game = $1 ORDER BY score DESC, created_at DESC LIMIT $2",
        )
        .bind(game.to_string())
        .bind(limit.max(0));
        self.fetch_records(query).await
    }
}
