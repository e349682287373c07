//! Computer opponent: move selection by difficulty tier.
//!
//! Randomness is injected by the caller, so tests can substitute a seeded or
//! scripted source and get deterministic choices.

use super::{Board, Outcome, Symbol};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Base score of a won position; a win `d` plies deep scores `10 - d`.
const WIN_SCORE: i32 = 10;

/// Move-selection policy.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random legal move.
    #[default]
    Easy,
    /// Each call flips a fair coin between `Hard` and `Easy`.
    ///
    /// The strength of a medium opponent is intentionally non-deterministic.
    Medium,
    /// Full-depth minimax; never loses.
    Hard,
}

/// Errors from [`choose_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SolverError {
    /// The board is full or already decided.
    #[display("No legal move: the game is over")]
    NoLegalMove,

    /// The solver was asked to move for the symbol that is not on turn.
    #[display("It is not {}'s turn", _0)]
    NotToMove(Symbol),
}

impl std::error::Error for SolverError {}

/// Picks a cell for `symbol` according to `difficulty`.
///
/// # Errors
///
/// - [`SolverError::NoLegalMove`] if the board is terminal. Callers should
///   check [`Board::evaluate`] first; hitting this is a contract violation.
/// - [`SolverError::NotToMove`] if `symbol` is not the side to move.
#[instrument(skip(board, rng), fields(empty = board.legal_moves().len()))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    symbol: Symbol,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<usize, SolverError> {
    if board.evaluate().is_terminal() {
        return Err(SolverError::NoLegalMove);
    }
    if board.to_move() != symbol {
        return Err(SolverError::NotToMove(symbol));
    }

    let index = match difficulty {
        Difficulty::Easy => random_move(board, rng)?,
        Difficulty::Medium => {
            if rng.gen_bool(0.5) {
                debug!("Medium delegating to minimax");
                best_move(board, symbol)?
            } else {
                debug!("Medium delegating to random");
                random_move(board, rng)?
            }
        }
        Difficulty::Hard => best_move(board, symbol)?,
    };

    debug!(index, "Solver chose move");
    Ok(index)
}

/// Uniform choice among empty cells.
fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<usize, SolverError> {
    board
        .legal_moves()
        .choose(rng)
        .copied()
        .ok_or(SolverError::NoLegalMove)
}

/// Minimax over the full remaining tree; first best index wins ties.
pub fn best_move(board: &Board, me: Symbol) -> Result<usize, SolverError> {
    let mut best: Option<(usize, i32)> = None;

    for index in board.legal_moves() {
        let Ok(child) = board.apply_move(index, me) else {
            continue;
        };
        let score = minimax(&child, me, 0);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index).ok_or(SolverError::NoLegalMove)
}

/// Scores `board` from `me`'s point of view; `depth` counts plies below the root move.
fn minimax(board: &Board, me: Symbol, depth: i32) -> i32 {
    match board.evaluate() {
        Outcome::Win { symbol, .. } if symbol == me => return WIN_SCORE - depth,
        Outcome::Win { .. } => return depth - WIN_SCORE,
        Outcome::Draw => return 0,
        Outcome::InProgress => {}
    }

    let mover = board.to_move();
    let scores = board
        .legal_moves()
        .into_iter()
        .filter_map(|index| board.apply_move(index, mover).ok())
        .map(|child| minimax(&child, me, depth + 1));

    if mover == me {
        scores.max().unwrap_or(0)
    } else {
        scores.min().unwrap_or(0)
    }
}
