//! First-class action types for tic-tac-toe.

use super::Symbol;
use serde::{Deserialize, Serialize};

/// A move: `symbol` claims the cell at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Target cell (0-8).
    pub index: usize,
    /// The symbol making the move.
    pub symbol: Symbol,
}

impl Move {
    /// Creates a new move.
    pub fn new(index: usize, symbol: Symbol) -> Self {
        Self { index, symbol }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.symbol, self.index)
    }
}

/// Reasons a move is illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Index outside `0..9`.
    #[display("Cell {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// The cell is already claimed.
    #[display("Cell {} is already occupied", _0)]
    Occupied(usize),

    /// Another symbol is to move.
    #[display("It's {}'s turn, not {}'s", expected, actual)]
    WrongTurn {
        /// Symbol whose turn it is.
        expected: Symbol,
        /// Symbol that tried to move.
        actual: Symbol,
    },

    /// The round already has a result.
    #[display("The game is already over")]
    GameOver,

    /// Mark counts break X/O alternation.
    #[display("Board marks are inconsistent with alternating turns")]
    Inconsistent,
}

impl std::error::Error for MoveError {}
