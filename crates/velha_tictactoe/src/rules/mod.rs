//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are separated from board storage so
//! the solver, the local session and the relay server share one definition.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::winning_line;

use super::{Board, Outcome};

/// Classifies a board as in progress, won or drawn.
///
/// Lines are checked in [`crate::Line::ALL`] order; the first completed line is
/// reported. A full board without a line is a draw.
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((symbol, line)) = winning_line(board) {
        return Outcome::Win { symbol, line };
    }
    if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
