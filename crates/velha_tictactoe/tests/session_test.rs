//! Tests for the client-local game session.

use rand::SeedableRng;
use rand::rngs::StdRng;
use velha_tictactoe::{
    Board, COMPUTER, Cell, Difficulty, GameSession, HUMAN, Mode, Move, MoveError, Outcome,
    SessionError, Symbol,
};

#[test]
fn test_local_round_alternates_human_and_computer() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = GameSession::local(Difficulty::Hard);
    assert!(session.is_local_turn());

    session.play(4).expect("Valid move");
    assert!(!session.is_local_turn());
    let turn = session.pending_computer_turn().expect("Computer to move");
    assert_eq!(turn.symbol, COMPUTER);

    let reply = session.computer_move(&mut rng).unwrap().expect("Computer moved");
    assert_eq!(session.board().get(reply), Some(Cell::Occupied(COMPUTER)));
    assert!(session.is_local_turn());
    assert!(session.pending_computer_turn().is_none());
}

#[test]
fn test_human_cannot_move_on_computer_turn() {
    let mut session = GameSession::local(Difficulty::Easy);
    session.play(0).unwrap();
    assert_eq!(
        session.play(1),
        Err(SessionError::Move(MoveError::WrongTurn {
            expected: COMPUTER,
            actual: HUMAN
        }))
    );
}

#[test]
fn test_occupied_cell_rejected_without_state_change() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut session = GameSession::local(Difficulty::Hard);
    session.play(4).unwrap();
    session.computer_move(&mut rng).unwrap();
    let before = *session.board();

    assert_eq!(session.play(4), Err(SessionError::Move(MoveError::Occupied(4))));
    assert_eq!(*session.board(), before);
}

#[test]
fn test_moves_rejected_after_game_over() {
    let mut session = GameSession::local(Difficulty::Easy);
    // Feed the computer's replies directly so the human wins the top row.
    session.play(0).unwrap();
    session.apply_computer_move(3).unwrap();
    session.play(1).unwrap();
    session.apply_computer_move(4).unwrap();
    let outcome = session.play(2).unwrap();

    assert_eq!(outcome.winner(), Some(HUMAN));
    assert!(session.pending_computer_turn().is_none());
    assert_eq!(session.play(5), Err(SessionError::Move(MoveError::GameOver)));
}

#[test]
fn test_undo_rewinds_full_round_and_redo_restores_it() {
    let mut session = GameSession::local(Difficulty::Easy);
    session.play(0).unwrap();
    session.apply_computer_move(4).unwrap();
    let after_round = *session.board();

    assert!(session.undo());
    assert_eq!(*session.board(), Board::new());
    assert!(session.is_local_turn());
    assert_eq!(session.redo_depth(), 1);

    assert!(session.redo());
    assert_eq!(*session.board(), after_round);
    assert!(!session.redo());
}

#[test]
fn test_new_move_clears_redo() {
    let mut session = GameSession::local(Difficulty::Easy);
    session.play(0).unwrap();
    session.apply_computer_move(4).unwrap();
    assert!(session.undo());

    session.play(8).unwrap();
    assert_eq!(session.redo_depth(), 0);
    assert!(!session.redo());
    assert_eq!(session.undo_depth(), 1);
}

#[test]
fn test_undo_on_fresh_session_is_noop() {
    let mut session = GameSession::local(Difficulty::Medium);
    assert!(!session.undo());
    assert!(!session.redo());
}

#[test]
fn test_set_difficulty_resets_board() {
    let mut session = GameSession::local(Difficulty::Easy);
    session.play(0).unwrap();
    session.set_difficulty(Difficulty::Hard).unwrap();

    assert_eq!(*session.board(), Board::new());
    assert_eq!(
        session.mode(),
        Mode::LocalAi {
            difficulty: Difficulty::Hard
        }
    );
    assert_eq!(session.undo_depth(), 0);
}

#[test]
fn test_online_propose_does_not_apply() {
    let session = GameSession::online(Symbol::X);
    let proposed = session.propose(4).unwrap();
    assert_eq!(proposed, Move::new(4, Symbol::X));
    assert_eq!(*session.board(), Board::new());
}

#[test]
fn test_online_propose_rejects_when_not_local_turn() {
    let session = GameSession::online(Symbol::O);
    assert!(!session.is_local_turn());
    assert!(matches!(
        session.propose(0),
        Err(SessionError::Move(MoveError::WrongTurn { .. }))
    ));
}

#[test]
fn test_online_confirm_applies_both_sides() {
    let mut session = GameSession::online(Symbol::O);
    session.confirm(4, Symbol::X).unwrap();
    assert!(session.is_local_turn());
    let outcome = session.confirm(0, Symbol::O).unwrap();
    assert_eq!(outcome, Outcome::InProgress);
    assert_eq!(session.board().count(Symbol::O), 1);
}

#[test]
fn test_online_mode_has_no_undo_or_computer() {
    let mut session = GameSession::online(Symbol::X);
    session.confirm(0, Symbol::X).unwrap();
    assert!(!session.undo());
    assert!(session.pending_computer_turn().is_none());
    assert_eq!(session.play(1), Err(SessionError::WrongMode));
    assert_eq!(
        session.set_difficulty(Difficulty::Hard),
        Err(SessionError::WrongMode)
    );
}

#[test]
fn test_sync_replaces_board() {
    let mut session = GameSession::online(Symbol::X);
    let board = Board::new().apply_move(2, Symbol::X).unwrap();
    session.sync(board);
    assert_eq!(*session.board(), board);
    assert!(!session.is_local_turn());
}
