// Public API - what other modules can use
pub use board::{Board, BoardOutcome, Marker, CENTER, CORNERS, WINNING_TRIPLES};
pub use guess::{draw_target, evaluate_guess, guess_score, GuessHint, MAX_TARGET, MIN_TARGET};
pub use opponent::choose_opponent_move;
pub use rps::{evaluate_choice, RpsChoice, RpsOutcome, RPS_WIN_SCORE};

// Internal modules
mod board;
mod guess;
pub mod handlers;
mod opponent;
mod rps;
mod types;

use crate::shared::AppError;

/// Score awarded for beating the computer at tic-tac-toe
pub const TIC_TAC_TOE_WIN_SCORE: i32 = 100;

#[derive(Debug, Clone, thiserror::Error)]
pub enum GameError {
    #[error("Board must have exactly 9 cells, got {0}")]
    WrongBoardSize(usize),
    #[error("Invalid cell token: {0}")]
    InvalidCellToken(String),
    #[error("Cell {0} is already occupied")]
    CellOccupied(usize),
    #[error("Position {0} is out of range")]
    PositionOutOfRange(usize),
    #[error("Guess must be between 1 and 100, got {0}")]
    GuessOutOfRange(i32),
    #[error("Unknown choice: {0}")]
    UnknownChoice(String),
    #[error("Round is already over")]
    RoundOver,
}

impl From<GameError> for AppError {
    fn from(error: GameError) -> Self {
        AppError::InvalidInput(error.to_string())
    }
}
