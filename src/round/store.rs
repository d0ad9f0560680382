use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::models::{GuessRound, RpsStreak};

/// Per-player round state, keyed by player id.
///
/// Each entry is exclusively owned by one player's session: absent means no
/// round is active, present means a round is in progress. Completing or
/// resetting a round clears the entry, so the next action starts fresh.
#[async_trait]
pub trait RoundStore: Send + Sync {
    async fn get_guess_round(&self, player_id: &str) -> Option<GuessRound>;
    async fn put_guess_round(&self, player_id: &str, round: GuessRound);
    /// Clears the active guessing round, returning whether one existed
    async fn clear_guess_round(&self, player_id: &str) -> bool;

    async fn get_rps_streak(&self, player_id: &str) -> Option<RpsStreak>;
    async fn put_rps_streak(&self, player_id: &str, streak: RpsStreak);
    async fn clear_rps_streak(&self, player_id: &str) -> bool;
}

/// In-memory implementation of RoundStore
///
/// Round state is ephemeral by design and lost on restart; a round simply
/// starts over on the player's next action.
#[derive(Debug, Default)]
pub struct InMemoryRoundStore {
    guess_rounds: Arc<RwLock<HashMap<String, GuessRound>>>,
    rps_streaks: Arc<RwLock<HashMap<String, RpsStreak>>>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoundStore for InMemoryRoundStore {
    #[instrument(skip(self))]
    async fn get_guess_round(&self, player_id: &str) -> Option<GuessRound> {
        self.guess_rounds.read().await.get(player_id).cloned()
    }

    #[instrument(skip(self, round))]
    async fn put_guess_round(&self, player_id: &str, round: GuessRound) {
        debug!(player_id = %player_id, attempts = round.attempts, "Storing guess round");
        self.guess_rounds
            .write()
            .await
            .insert(player_id.to_string(), round);
    }

    #[instrument(skip(self))]
    async fn clear_guess_round(&self, player_id: &str) -> bool {
        let existed = self.guess_rounds.write().await.remove(player_id).is_some();
        debug!(player_id = %player_id, existed, "Cleared guess round");
        existed
    }

    #[instrument(skip(self))]
    async fn get_rps_streak(&self, player_id: &str) -> Option<RpsStreak> {
        self.rps_streaks.read().await.get(player_id).cloned()
    }

    #[instrument(skip(self, streak))]
    async fn put_rps_streak(&self, player_id: &str, streak: RpsStreak) {
        self.rps_streaks
            .write()
            .await
            .insert(player_id.to_string(), streak);
    }

    #[instrument(skip(self))]
    async fn clear_rps_streak(&self, player_id: &str) -> bool {
        self.rps_streaks.write().await.remove(player_id).is_some()
    }
}
