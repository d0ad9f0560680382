use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::board::{Board, BoardOutcome, Marker, CENTER, CORNERS};

/// Picks the computer's next move for a non-terminal board.
///
/// Fixed priority heuristic, tried in order until one applies:
/// 1. take an immediate win for `O`
/// 2. block an immediate win for `X`
/// 3. take the center
/// 4. take a random open corner
/// 5. take any random open cell
///
/// The returned index is always an open cell. Returns `None` only when the
/// board is full; callers are expected to have checked terminality first.
/// Randomness comes from the injected `rng` so tests can seed it.
pub fn choose_opponent_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    if let Some(index) = winning_cell(board, Marker::O) {
        debug!(index, "Opponent takes winning cell");
        return Some(index);
    }

    if let Some(index) = winning_cell(board, Marker::X) {
        debug!(index, "Opponent blocks player win");
        return Some(index);
    }

    if board.is_open(CENTER) {
        return Some(CENTER);
    }

    let open_corners: Vec<usize> = CORNERS
        .iter()
        .copied()
        .filter(|&i| board.is_open(i))
        .collect();
    if let Some(&index) = open_corners.choose(rng) {
        return Some(index);
    }

    board.open_cells().choose(rng).copied()
}

/// Finds an open cell that completes a winning triple for `marker`,
/// by trying each open cell against the evaluator
fn winning_cell(board: &Board, marker: Marker) -> Option<usize> {
    for index in board.open_cells() {
        let mut trial = board.clone();
        if trial.place(index, marker).is_err() {
            continue;
        }
        if trial.evaluate() == BoardOutcome::Winner(marker) {
            return Some(index);
        }
    }
    None
}
