use serde::{Deserialize, Serialize};

use super::guess::GuessHint;
use super::rps::{RpsChoice, RpsOutcome};

/// Request payload for a number-guessing attempt
#[derive(Debug, Deserialize)]
pub struct GuessRequest {
    pub player_name: Option<String>,
    pub guess: i32,
}

/// Response for a number-guessing attempt.
///
/// `player_name` echoes the resolved identity so a client that started
/// without a name can keep its generated guest name for the rest of the
/// round.
#[derive(Debug, Serialize, Deserialize)]
pub struct GuessResponse {
    pub player_name: String,
    pub guess: i32,
    pub hint: GuessHint,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request payload for a tic-tac-toe move
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub player_name: Option<String>,
    pub board: Vec<String>,
    pub position: usize,
}

/// Response for a tic-tac-toe move; `winner` is "X", "O" or "Draw" once the
/// round is over
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveResponse {
    pub player_name: String,
    pub board: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request payload for a rock-paper-scissors round
#[derive(Debug, Deserialize)]
pub struct RpsRequest {
    pub player_name: Option<String>,
    pub choice: RpsChoice,
}

/// Response for a rock-paper-scissors round, including the session tally
#[derive(Debug, Serialize, Deserialize)]
pub struct RpsResponse {
    pub player_name: String,
    pub player_choice: RpsChoice,
    pub computer_choice: RpsChoice,
    pub result: RpsOutcome,
    pub games_played: u32,
    pub wins: u32,
    pub win_rate: f64,
}

/// Request payload for abandoning an active round or tally
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub player_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub player_name: String,
    pub cleared: bool,
}
