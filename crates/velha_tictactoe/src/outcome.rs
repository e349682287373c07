//! Terminal classification of a board.

use super::types::Symbol;
use serde::{Deserialize, Serialize};

/// One of the eight winning triples of cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line([usize; 3]);

impl Line {
    /// Rows, then columns, then diagonals.
    pub const ALL: [Line; 8] = [
        Line([0, 1, 2]),
        Line([3, 4, 5]),
        Line([6, 7, 8]),
        Line([0, 3, 6]),
        Line([1, 4, 7]),
        Line([2, 5, 8]),
        Line([0, 4, 8]),
        Line([2, 4, 6]),
    ];

    /// The three cell indices of this line.
    pub fn cells(self) -> [usize; 3] {
        self.0
    }

    /// Whether `cells` is one of the canonical lines.
    pub fn is_canonical(cells: [usize; 3]) -> bool {
        Self::ALL.iter().any(|line| line.0 == cells)
    }
}

/// Classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Outcome {
    /// No winner yet and at least one empty cell.
    InProgress,
    /// `symbol` holds all three cells of `line`.
    Win {
        /// The winning symbol.
        symbol: Symbol,
        /// The completed line.
        line: Line,
    },
    /// Full board, no line.
    Draw,
}

impl Outcome {
    /// Returns true for `Win` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winning symbol, if any.
    pub fn winner(&self) -> Option<Symbol> {
        match self {
            Outcome::Win { symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    /// Collapses a terminal outcome into a [`Winner`]; `None` while in progress.
    pub fn verdict(&self) -> Option<Winner> {
        match self {
            Outcome::InProgress => None,
            Outcome::Win { symbol, .. } => Some(Winner::from(*symbol)),
            Outcome::Draw => Some(Winner::Draw),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Win { symbol, .. } => write!(f, "{} wins", symbol),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Result of a finished round as reported over the wire: `"X"`, `"O"` or `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Winner {
    /// X won.
    X,
    /// O won.
    O,
    /// Nobody won.
    #[serde(rename = "draw")]
    #[strum(serialize = "draw")]
    Draw,
}

impl From<Symbol> for Winner {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Winner::X,
            Symbol::O => Winner::O,
        }
    }
}
