use rand::Rng;
use serde::{Deserialize, Serialize};

use super::GameError;

pub const MIN_TARGET: i32 = 1;
pub const MAX_TARGET: i32 = 100;

/// Floor score for a completed guessing round, no matter how many attempts
pub const MIN_GUESS_SCORE: i32 = 10;

/// Hint returned for a single guess against the round's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessHint {
    Correct,
    TooLow,
    TooHigh,
}

/// Compares a guess against the target.
///
/// Guesses outside the declared 1-100 range are rejected before evaluation.
pub fn evaluate_guess(guess: i32, target: i32) -> Result<GuessHint, GameError> {
    if !(MIN_TARGET..=MAX_TARGET).contains(&guess) {
        return Err(GameError::GuessOutOfRange(guess));
    }

    let hint = match guess.cmp(&target) {
        std::cmp::Ordering::Equal => GuessHint::Correct,
        std::cmp::Ordering::Less => GuessHint::TooLow,
        std::cmp::Ordering::Greater => GuessHint::TooHigh,
    };
    Ok(hint)
}

/// Score for a finished round: 100 minus attempts, floored at 10
pub fn guess_score(attempts: u32) -> i32 {
    (100 - attempts as i32).max(MIN_GUESS_SCORE)
}

/// Draws a fresh target for a new round from the injected RNG
pub fn draw_target<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(MIN_TARGET..=MAX_TARGET)
}
