use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use super::errors::ScoreError;
use super::models::{GameAggregate, GameKind, PlayerAggregate, ScoreRecord};
use super::repository::ScoreRepository;

/// How many times a conflicted ledger write is retried before the transient
/// failure is surfaced to the caller
const MAX_RECORD_ATTEMPTS: u32 = 3;

/// Service owning the score ledger's write path and the derived statistics.
///
/// The personal-best decision is a read followed by a write: it must not
/// interleave with another writer for the same (player, game) pair. Writers
/// are serialized with one async mutex per pair; the write itself is a
/// single repository transaction, so a conflicted attempt (e.g. a database
/// serialization failure) leaves nothing behind and is retried with bounded
/// attempts. Lock entries are dropped once the last writer for a pair
/// finishes, so the map stays proportional to in-flight writes.
pub struct ScoreService {
    repository: Arc<dyn ScoreRepository + Send + Sync>,
    pair_locks: Mutex<HashMap<(String, GameKind), Arc<tokio::sync::Mutex<()>>>>,
}

impl ScoreService {
    pub fn new(repository: Arc<dyn ScoreRepository + Send + Sync>) -> Self {
        Self {
            repository,
            pair_locks: Mutex::new(HashMap::new()),
        }
    }

    fn pair_lock(&self, player_id: &str, game: GameKind) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.pair_locks.lock().unwrap();
        locks
            .entry((player_id.to_string(), game))
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Removes the pair's lock entry once no other writer holds or awaits
    /// it. Cloning out of the map and removal both run under the map mutex,
    /// so a concurrently arriving writer either keeps the entry alive
    /// (strong count above two) or creates a fresh one after removal.
    fn release_pair_lock(
        &self,
        player_id: &str,
        game: GameKind,
        lock: &Arc<tokio::sync::Mutex<()>>,
    ) {
        let mut locks = self.pair_locks.lock().unwrap();
        let key = (player_id.to_string(), game);
        if let Some(entry) = locks.get(&key) {
            if Arc::ptr_eq(entry, lock) && Arc::strong_count(entry) == 2 {
                locks.remove(&key);
            }
        }
    }

    /// Records one completed round and recomputes the derived statistics.
    ///
    /// The new record is the personal best iff every existing record for the
    /// pair has a strictly lower score; on an exact tie the earliest record
    /// keeps the flag. At most one previously-best record is demoted.
    #[instrument(skip(self))]
    pub async fn record_score(
        &self,
        player_id: &str,
        game: GameKind,
        score: i32,
        attempts: i32,
        duration_ms: Option<i64>,
    ) -> Result<ScoreRecord, ScoreError> {
        if score < 0 {
            return Err(ScoreError::Validation(format!(
                "Score cannot be negative: {}",
                score
            )));
        }
        if attempts < 0 {
            return Err(ScoreError::Validation(format!(
                "Attempts cannot be negative: {}",
                attempts
            )));
        }

        let lock = self.pair_lock(player_id, game);
        let result = {
            let _guard = lock.lock().await;
            self.record_with_retries(player_id, game, score, attempts, duration_ms)
                .await
        };
        self.release_pair_lock(player_id, game, &lock);
        result
    }

    async fn record_with_retries(
        &self,
        player_id: &str,
        game: GameKind,
        score: i32,
        attempts: i32,
        duration_ms: Option<i64>,
    ) -> Result<ScoreRecord, ScoreError> {
        let mut last_error = None;
        for attempt in 1..=MAX_RECORD_ATTEMPTS {
            match self
                .record_score_once(player_id, game, score, attempts, duration_ms)
                .await
            {
                Ok(record) => {
                    info!(
                        record_id = %record.id,
                        player_id = %player_id,
                        game = %game,
                        score,
                        is_personal_best = record.is_personal_best,
                        "Score recorded"
                    );
                    return Ok(record);
                }
                Err(error @ ScoreError::Conflict { .. }) => {
                    warn!(
                        player_id = %player_id,
                        game = %game,
                        attempt,
                        "Conflicted ledger write, retrying"
                    );
                    last_error = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        Err(last_error.unwrap_or(ScoreError::Conflict {
            player_id: player_id.to_string(),
            game: game.to_string(),
        }))
    }

    async fn record_score_once(
        &self,
        player_id: &str,
        game: GameKind,
        score: i32,
        attempts: i32,
        duration_ms: Option<i64>,
    ) -> Result<ScoreRecord, ScoreError> {
        let existing = self.repository.records_for_pair(player_id, game).await?;

        // Strictly-greater beats the flag; an exact tie leaves the earliest
        // record as the best
        let is_best = existing.iter().all(|r| r.score < score);
        let demote_id = if is_best {
            existing
                .iter()
                .find(|r| r.is_personal_best)
                .map(|r| r.id.clone())
        } else {
            None
        };
        if let Some(record_id) = &demote_id {
            debug!(
                record_id = %record_id,
                new_score = score,
                "Demoting previous personal best"
            );
        }

        let mut record = ScoreRecord::new(
            player_id.to_string(),
            game,
            score,
            attempts,
            duration_ms,
        );
        record.is_personal_best = is_best;

        // One repository transaction: a conflicted attempt rolls back
        // wholly, so a retry never sees a half-applied round
        self.repository
            .commit_round(&record, demote_id.as_deref())
            .await?;
        Ok(record)
    }

    pub async fn recent_scores(&self, limit: i64) -> Result<Vec<ScoreRecord>, ScoreError> {
        self.repository.recent_records(limit).await
    }

    pub async fn leaderboard(
        &self,
        game: GameKind,
        limit: i64,
    ) -> Result<Vec<ScoreRecord>, ScoreError> {
        self.repository.top_records(game, limit).await
    }

    pub async fn player_stats(
        &self,
        player_id: &str,
    ) -> Result<Option<PlayerAggregate>, ScoreError> {
        self.repository.get_player_aggregate(player_id).await
    }

    pub async fn game_stats(&self, game: GameKind) -> Result<Option<GameAggregate>, ScoreError> {
        self.repository.get_game_aggregate(game).await
    }
}
