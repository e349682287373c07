//! Velha tic-tac-toe core.
//!
//! Pure game logic shared by the relay server and local clients.
//!
//! # Architecture
//!
//! - **Board engine**: [`Board`], [`rules::evaluate`], legal moves
//! - **Solver**: [`choose_move`] with [`Difficulty`] tiers
//! - **Session**: client-local [`GameSession`] with undo/redo
//! - **Scores**: [`ScoreStore`] persisting a [`ScoreBoard`]
//!
//! # Example
//!
//! ```
//! use velha_tictactoe::{Board, Difficulty, Outcome, Symbol, choose_move};
//!
//! let board = Board::new().apply_move(4, Symbol::X)?;
//! let reply = choose_move(&board, Symbol::O, Difficulty::Hard, &mut rand::thread_rng())?;
//! let board = board.apply_move(reply, Symbol::O)?;
//! assert_eq!(board.evaluate(), Outcome::InProgress);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod outcome;
pub mod rules;
mod scores;
mod session;
mod solver;
mod types;

pub use action::{Move, MoveError};
pub use outcome::{Line, Outcome, Winner};
pub use scores::{STORAGE_KEY, ScoreBoard, ScoreError, ScoreStore};
pub use session::{COMPUTER, ComputerTurn, GameSession, HUMAN, Mode, SessionError};
pub use solver::{Difficulty, SolverError, best_move, choose_move};
pub use types::{Board, Cell, Symbol};
