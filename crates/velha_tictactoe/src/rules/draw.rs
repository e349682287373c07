//! Draw detection logic for tic-tac-toe.

use super::super::{Board, Cell};

/// Checks if every cell is occupied.
///
/// A full board with no winner is a draw.
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|cell| *cell != Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::evaluate;
    use super::*;
    use crate::{Outcome, Symbol};

    fn board_from(moves: &[usize]) -> Board {
        let mut board = Board::new();
        for &index in moves {
            board = board.apply_move(index, board.to_move()).unwrap();
        }
        board
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        assert!(!is_full(&board_from(&[4])));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / X O O / O X X
        let board = board_from(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(is_full(&board));
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_win_on_last_move_is_not_draw() {
        // X O X / O X X / O O X, the ninth move completes two lines at once
        let board = board_from(&[0, 1, 2, 3, 5, 6, 4, 7, 8]);
        assert!(is_full(&board));
        assert_eq!(evaluate(&board).winner(), Some(Symbol::X));
    }
}
