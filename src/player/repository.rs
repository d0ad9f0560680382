use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::PlayerModel;
use crate::shared::AppError;

/// Trait for player identity operations
///
/// Lookup by name uses get-or-create semantics: this is the one documented
/// place where an unknown reference is created rather than surfaced as
/// NotFound.
#[async_trait]
pub trait PlayerRepository {
    async fn get_or_create(&self, name: &str) -> Result<PlayerModel, AppError>;
    async fn get(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError>;
    async fn get_by_name(&self, name: &str) -> Result<Option<PlayerModel>, AppError>;
}

/// In-memory implementation of PlayerRepository for development and testing
pub struct InMemoryPlayerRepository {
    players_by_name: Mutex<HashMap<String, PlayerModel>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players_by_name: Mutex::new(HashMap::new()),
        }
    }

    pub fn player_count(&self) -> usize {
        self.players_by_name.lock().unwrap().len()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self))]
    async fn get_or_create(&self, name: &str) -> Result<PlayerModel, AppError> {
        let mut players = self.players_by_name.lock().unwrap();
        if let Some(player) = players.get(name) {
            debug!(player_id = %player.id, name = %name, "Player found in memory");
            return Ok(player.clone());
        }

        let player = PlayerModel::new(name.to_string());
        debug!(player_id = %player.id, name = %name, "Created player in memory");
        players.insert(name.to_string(), player.clone());
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn get(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let players = self.players_by_name.lock().unwrap();
        Ok(players.values().find(|p| p.id == player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> Result<Option<PlayerModel>, AppError> {
        let players = self.players_by_name.lock().unwrap();
        Ok(players.get(name).cloned())
    }
}

/// PostgreSQL implementation of player repository
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_player(row: &sqlx::postgres::PgRow) -> PlayerModel {
        PlayerModel {
            id: row.get("id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    #[instrument(skip(self))]
    async fn get_or_create(&self, name: &str) -> Result<PlayerModel, AppError> {
        debug!(name = %name, "Resolving player in database");

        let candidate = PlayerModel::new(name.to_string());

        // Insert-if-absent, then read back whichever row won. The unique
        // constraint on name makes concurrent resolution safe.
        sqlx::query(
            "INSERT INTO players (id, name, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(&candidate.id)
        .bind(&candidate.name)
        .bind(candidate.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, name = %name, "Failed to insert player");
            AppError::DatabaseError(e.to_string())
        })?;

        let row = sqlx::query("SELECT id, name, created_at FROM players WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, name = %name, "Failed to fetch player after insert");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(Self::row_to_player(&row))
    }

    #[instrument(skip(self))]
    async fn get(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let row = sqlx::query("SELECT id, name, created_at FROM players WHERE id = $1")
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, player_id = %player_id, "Failed to fetch player");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.as_ref().map(Self::row_to_player))
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> Result<Option<PlayerModel>, AppError> {
        let row = sqlx::query("SELECT id, name, created_at FROM players WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, name = %name, "Failed to fetch player by name");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.as_ref().map(Self::row_to_player))
    }
}
