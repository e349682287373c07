//! Tests for the computer opponent.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use velha_tictactoe::{Board, Difficulty, Outcome, SolverError, Symbol, best_move, choose_move};

/// Random source that replays a fixed sequence of words, then zeros.
struct ScriptedRng(VecDeque<u64>);

impl ScriptedRng {
    fn new(words: &[u64]) -> Self {
        Self(words.iter().copied().collect())
    }
}

impl rand::RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0.pop_front().unwrap_or(0)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand::RngCore::try_fill_bytes(self, dest).unwrap()
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
        Ok(())
    }
}

fn play(moves: &[usize]) -> Board {
    let mut board = Board::new();
    for &index in moves {
        board = board.apply_move(index, board.to_move()).unwrap();
    }
    board
}

fn hard(board: &Board) -> usize {
    best_move(board, board.to_move()).unwrap()
}

/// True if some opponent strategy beats Hard playing `solver`.
fn hard_can_lose(board: Board, solver: Symbol) -> bool {
    match board.evaluate() {
        Outcome::Win { symbol, .. } => return symbol != solver,
        Outcome::Draw => return false,
        Outcome::InProgress => {}
    }
    if board.to_move() == solver {
        let reply = hard(&board);
        hard_can_lose(board.apply_move(reply, solver).unwrap(), solver)
    } else {
        board.legal_moves().into_iter().any(|index| {
            hard_can_lose(board.apply_move(index, solver.opponent()).unwrap(), solver)
        })
    }
}

#[test]
fn test_hard_vs_hard_is_a_draw() {
    let mut board = Board::new();
    while !board.evaluate().is_terminal() {
        board = board.apply_move(hard(&board), board.to_move()).unwrap();
    }
    assert_eq!(board.evaluate(), Outcome::Draw);
}

#[test]
fn test_hard_takes_immediate_win() {
    // X X . / O O . / . . .  with X to move
    let board = play(&[0, 3, 1, 4]);
    assert_eq!(hard(&board), 2);
}

#[test]
fn test_hard_blocks_win_in_one() {
    // X X . / . O . / . . .  with O to move: must block at 2
    let board = play(&[0, 4, 1]);
    assert_eq!(hard(&board), 2);
}

#[test]
fn test_hard_prefers_faster_win() {
    // X . . / X O . / . O .  X to move: 6 wins now; anything else is slower.
    let board = play(&[0, 4, 3, 7]);
    assert_eq!(hard(&board), 6);
}

#[test]
fn test_hard_as_o_never_loses_after_center_opening() {
    let board = play(&[4]);
    assert!(!hard_can_lose(board, Symbol::O));
}

#[test]
fn test_hard_as_o_never_loses() {
    assert!(!hard_can_lose(Board::new(), Symbol::O));
}

#[test]
fn test_hard_as_x_never_loses() {
    assert!(!hard_can_lose(Board::new(), Symbol::X));
}

#[test]
fn test_hard_ties_break_to_lowest_index() {
    // Every opening is a draw under perfect play, so the first cell is chosen.
    assert_eq!(hard(&Board::new()), 0);
}

#[test]
fn test_easy_returns_legal_move() {
    let mut rng = StdRng::seed_from_u64(7);
    let board = play(&[0, 4, 8]);
    for _ in 0..50 {
        let index = choose_move(&board, Symbol::O, Difficulty::Easy, &mut rng).unwrap();
        assert!(board.is_empty(index));
    }
}

#[test]
fn test_easy_with_scripted_source_picks_first_empty() {
    let board = play(&[0, 4]);
    let mut rng = ScriptedRng::new(&[0]);
    assert_eq!(
        choose_move(&board, Symbol::X, Difficulty::Easy, &mut rng),
        Ok(1)
    );
}

#[test]
fn test_medium_heads_delegates_to_hard() {
    // X . . / X O . / . . .  Hard blocks at 6; a low word means "heads".
    let board = play(&[3, 4, 0]);
    let mut rng = ScriptedRng::new(&[0]);
    assert_eq!(
        choose_move(&board, Symbol::O, Difficulty::Medium, &mut rng),
        Ok(6)
    );
}

#[test]
fn test_medium_tails_delegates_to_easy() {
    // A high word means "tails"; the following zero picks the first empty cell.
    let board = play(&[3, 4, 0]);
    let mut rng = ScriptedRng::new(&[u64::MAX, 0]);
    assert_eq!(
        choose_move(&board, Symbol::O, Difficulty::Medium, &mut rng),
        Ok(1)
    );
}

#[test]
fn test_no_legal_move_on_full_board() {
    let board = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    let mut rng = StdRng::seed_from_u64(1);
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        assert_eq!(
            choose_move(&board, board.to_move(), difficulty, &mut rng),
            Err(SolverError::NoLegalMove)
        );
    }
}

#[test]
fn test_no_legal_move_on_won_board() {
    let board = play(&[0, 3, 1, 4, 2]);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        choose_move(&board, Symbol::O, Difficulty::Hard, &mut rng),
        Err(SolverError::NoLegalMove)
    );
}

#[test]
fn test_solver_refuses_off_turn_symbol() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        choose_move(&Board::new(), Symbol::O, Difficulty::Hard, &mut rng),
        Err(SolverError::NotToMove(Symbol::O))
    );
}

#[test]
fn test_difficulty_parses_case_insensitively() {
    assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    assert!("impossible".parse::<Difficulty>().is_err());
    assert_eq!(Difficulty::Easy.to_string(), "easy");
}
