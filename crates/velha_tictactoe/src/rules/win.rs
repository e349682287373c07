//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Line, Symbol};

/// Returns the first line whose three cells hold the same symbol.
pub fn winning_line(board: &Board) -> Option<(Symbol, Line)> {
    let cells = board.cells();
    Line::ALL.into_iter().find_map(|line| {
        let [a, b, c] = line.cells();
        match cells[a] {
            Cell::Occupied(symbol) if cells[b] == cells[a] && cells[c] == cells[a] => {
                Some((symbol, line))
            }
            _ => None,
        }
    })
}
