use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::draw_target;

/// In-progress state for one player's number-guessing round.
///
/// A round exists only between the first guess and the correct guess (or an
/// explicit reset): absent state means no round, present state means a round
/// in progress, and completion clears the state again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRound {
    pub target: i32,
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
}

impl GuessRound {
    /// Starts a fresh round with a target drawn from the injected RNG
    pub fn start<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            target: draw_target(rng),
            attempts: 0,
            started_at: Utc::now(),
        }
    }

    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Time spent on the round so far
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }
}

/// Session-scoped tally of rock-paper-scissors rounds for one player.
///
/// Feeds the win-rate context shown after each round and the `attempts`
/// value recorded with a winning score. Cleared on explicit reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpsStreak {
    pub games_played: u32,
    pub wins: u32,
}

impl RpsStreak {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, won: bool) {
        self.games_played += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Win percentage rounded to one decimal place
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let rate = (self.wins as f64 / self.games_played as f64) * 100.0;
        (rate * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_round_starts_with_zero_attempts() {
        let mut rng = StdRng::seed_from_u64(1);
        let round = GuessRound::start(&mut rng);

        assert_eq!(round.attempts, 0);
        assert!((1..=100).contains(&round.target));
    }

    #[test]
    fn attempts_accumulate() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut round = GuessRound::start(&mut rng);

        round.record_attempt();
        round.record_attempt();
        round.record_attempt();
        assert_eq!(round.attempts, 3);
    }

    #[test]
    fn seeded_rounds_are_deterministic() {
        let target_a = GuessRound::start(&mut StdRng::seed_from_u64(9)).target;
        let target_b = GuessRound::start(&mut StdRng::seed_from_u64(9)).target;
        assert_eq!(target_a, target_b);
    }

    #[test]
    fn streak_tracks_wins_and_rate() {
        let mut streak = RpsStreak::new();
        assert_eq!(streak.win_rate(), 0.0);

        streak.record(true);
        streak.record(false);
        streak.record(true);

        assert_eq!(streak.games_played, 3);
        assert_eq!(streak.wins, 2);
        assert_eq!(streak.win_rate(), 66.7);
    }
}
