use serde::{Deserialize, Serialize};

use super::GameError;

/// A mark placed on the board. The human player always plays `X`,
/// the computer opponent plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::X => "X",
            Marker::O => "O",
        }
    }
}

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
pub const WINNING_TRIPLES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Result of evaluating a board position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOutcome {
    Winner(Marker),
    Draw,
    InProgress,
}

impl BoardOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BoardOutcome::InProgress)
    }
}

/// A tic-tac-toe board: 9 cells indexed row-major, 0 through 8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Marker>; 9],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self { cells: [None; 9] }
    }

    /// Parses the wire form used by clients: 9 strings, each "" / "X" / "O".
    ///
    /// Rejects a wrong cell count and unknown tokens; never coerces bad
    /// input.
    pub fn parse(cells: &[String]) -> Result<Self, GameError> {
        if cells.len() != 9 {
            return Err(GameError::WrongBoardSize(cells.len()));
        }

        let mut parsed = [None; 9];
        for (i, token) in cells.iter().enumerate() {
            parsed[i] = match token.as_str() {
                "" => None,
                "X" => Some(Marker::X),
                "O" => Some(Marker::O),
                other => return Err(GameError::InvalidCellToken(other.to_string())),
            };
        }

        Ok(Self { cells: parsed })
    }

    /// Renders back to the wire form
    pub fn to_wire(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|cell| match cell {
                Some(marker) => marker.as_str().to_string(),
                None => String::new(),
            })
            .collect()
    }

    pub fn cell(&self, index: usize) -> Option<Marker> {
        self.cells[index]
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.cells[index].is_none()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    pub fn open_cells(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.is_open(i)).collect()
    }

    pub fn count(&self, marker: Marker) -> usize {
        self.cells.iter().filter(|&&c| c == Some(marker)).count()
    }

    /// Places a marker on an open cell
    pub fn place(&mut self, index: usize, marker: Marker) -> Result<(), GameError> {
        if index >= 9 {
            return Err(GameError::PositionOutOfRange(index));
        }
        if !self.is_open(index) {
            return Err(GameError::CellOccupied(index));
        }
        self.cells[index] = Some(marker);
        Ok(())
    }

    /// Scans the winning triples in order; the first all-equal non-empty
    /// triple decides the winner. A full board with no winner is a draw.
    pub fn evaluate(&self) -> BoardOutcome {
        for triple in &WINNING_TRIPLES {
            if let Some(marker) = self.cells[triple[0]] {
                if self.cells[triple[1]] == Some(marker) && self.cells[triple[2]] == Some(marker) {
                    return BoardOutcome::Winner(marker);
                }
            }
        }

        if self.is_full() {
            BoardOutcome::Draw
        } else {
            BoardOutcome::InProgress
        }
    }
}
