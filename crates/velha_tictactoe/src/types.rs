//! Core domain types for tic-tac-toe.

use super::action::MoveError;
use super::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// One of the two move-making identities.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Symbol {
    /// Symbol X (always moves first).
    X,
    /// Symbol O (moves second).
    O,
}

impl Symbol {
    /// Returns the opposing symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Unclaimed cell.
    Empty,
    /// Cell claimed by a symbol.
    Occupied(Symbol),
}

impl Cell {
    /// Returns the symbol in this cell, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(symbol) => Some(symbol),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Boards are small `Copy` values: [`Board::apply_move`] returns a new board
/// and leaves the receiver untouched, so tree search never needs undo
/// bookkeeping.
///
/// Serialized as nine `null | "X" | "O"` marks; deserialization goes through
/// [`Board::from_marks`] and rejects inconsistent mark counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Option<Symbol>; 9]", into = "[Option<Symbol>; 9]")]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Number of cells on the board.
    pub const SIZE: usize = 9;

    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; Self::SIZE],
        }
    }

    /// Rebuilds a board from per-cell marks, as carried on the wire.
    ///
    /// Fails with [`MoveError::Inconsistent`] when the mark counts could not
    /// arise from X and O alternating with X first.
    pub fn from_marks(marks: [Option<Symbol>; 9]) -> Result<Self, MoveError> {
        let board = Self {
            cells: marks.map(|mark| mark.map_or(Cell::Empty, Cell::Occupied)),
        };
        if board.is_consistent() {
            Ok(board)
        } else {
            Err(MoveError::Inconsistent)
        }
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the cells as optional marks, `None` for empty.
    pub fn marks(&self) -> [Option<Symbol>; 9] {
        self.cells.map(Cell::symbol)
    }

    /// Counts the cells claimed by `symbol`.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Cell::Occupied(symbol))
            .count()
    }

    /// Returns the symbol whose turn it is, derived from the mark counts.
    pub fn to_move(&self) -> Symbol {
        if self.count(Symbol::X) > self.count(Symbol::O) {
            Symbol::O
        } else {
            Symbol::X
        }
    }

    /// X-count minus O-count is 0 or 1.
    pub fn is_consistent(&self) -> bool {
        let x = self.count(Symbol::X);
        let o = self.count(Symbol::O);
        x == o || x == o + 1
    }

    /// Returns a copy of the board with `symbol` placed at `index`.
    ///
    /// # Errors
    ///
    /// - [`MoveError::OutOfRange`] if `index` is not in `0..9`
    /// - [`MoveError::Occupied`] if the cell is already claimed
    /// - [`MoveError::WrongTurn`] if it is not `symbol`'s turn
    pub fn apply_move(&self, index: usize, symbol: Symbol) -> Result<Board, MoveError> {
        match self.get(index) {
            None => return Err(MoveError::OutOfRange(index)),
            Some(Cell::Occupied(_)) => return Err(MoveError::Occupied(index)),
            Some(Cell::Empty) => {}
        }

        let expected = self.to_move();
        if symbol != expected {
            return Err(MoveError::WrongTurn {
                expected,
                actual: symbol,
            });
        }

        let mut next = *self;
        next.cells[index] = Cell::Occupied(symbol);
        Ok(next)
    }

    /// Indices of all empty cells, ascending.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..Self::SIZE).filter(|&index| self.is_empty(index)).collect()
    }

    /// Classifies the board. See [`crate::rules::evaluate`].
    pub fn evaluate(&self) -> Outcome {
        super::rules::evaluate(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<[Option<Symbol>; 9]> for Board {
    type Error = MoveError;

    fn try_from(marks: [Option<Symbol>; 9]) -> Result<Self, Self::Error> {
        Self::from_marks(marks)
    }
}

impl From<Board> for [Option<Symbol>; 9] {
    fn from(board: Board) -> Self {
        board.marks()
    }
}

impl std::fmt::Display for Board {
    /// Renders the board with empty cells numbered 1-9.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                match self.cells[index] {
                    Cell::Empty => write!(f, "{}", index + 1)?,
                    Cell::Occupied(symbol) => write!(f, "{}", symbol)?,
                }
                if col < 2 {
                    f.write_str("|")?;
                }
            }
            if row < 2 {
                f.write_str("\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}
