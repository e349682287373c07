//! Client-local game session.
//!
//! A session owns one board and knows whether it is played against the
//! computer or mirrored from the relay server. In local mode the human plays
//! X and the solver plays O, with undo/redo over past positions. In online mode
//! the server is authoritative: local moves are only proposed, and the board
//! changes when the server confirms a move.

use super::action::{Move, MoveError};
use super::solver::{self, Difficulty, SolverError};
use super::{Board, Outcome, Symbol};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// How the session is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum Mode {
    /// Human versus the solver.
    LocalAi {
        /// Solver policy.
        difficulty: Difficulty,
    },
    /// Two humans through the relay server.
    Online {
        /// The symbol the server assigned to this client.
        local: Symbol,
    },
}

/// The human's symbol in local mode.
pub const HUMAN: Symbol = Symbol::X;

/// The solver's symbol in local mode.
pub const COMPUTER: Symbol = Symbol::O;

/// Errors from session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The move itself is illegal.
    #[display("Illegal move: {}", _0)]
    Move(MoveError),

    /// The solver could not produce a move.
    #[display("Solver failed: {}", _0)]
    Solver(SolverError),

    /// The operation is not available in the current mode.
    #[display("Not available in this mode")]
    WrongMode,
}

impl std::error::Error for SessionError {}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        SessionError::Move(err)
    }
}

impl From<SolverError> for SessionError {
    fn from(err: SolverError) -> Self {
        SessionError::Solver(err)
    }
}

/// Solver work for the pending computer turn.
///
/// Returned by [`GameSession::pending_computer_turn`] so the search can run
/// off the interaction thread and be fed back with
/// [`GameSession::apply_computer_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerTurn {
    /// Position to search.
    pub board: Board,
    /// Symbol the solver plays.
    pub symbol: Symbol,
    /// Policy to use.
    pub difficulty: Difficulty,
}

impl ComputerTurn {
    /// Runs the solver for this turn.
    pub fn solve<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, SolverError> {
        solver::choose_move(&self.board, self.symbol, self.difficulty, rng)
    }
}

/// One game as seen by a single client.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    mode: Mode,
    undo: Vec<Board>,
    redo: Vec<Board>,
}

impl GameSession {
    /// Creates a local session against the solver.
    #[instrument]
    pub fn local(difficulty: Difficulty) -> Self {
        info!(%difficulty, "Starting local session");
        Self::with_mode(Mode::LocalAi { difficulty })
    }

    /// Creates an online session for the symbol the server assigned.
    #[instrument]
    pub fn online(local: Symbol) -> Self {
        info!(%local, "Starting online session");
        Self::with_mode(Mode::Online { local })
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            board: Board::new(),
            mode,
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the symbol on turn.
    pub fn to_move(&self) -> Symbol {
        self.board.to_move()
    }

    /// Evaluates the current board.
    pub fn outcome(&self) -> Outcome {
        self.board.evaluate()
    }

    /// True when the local user may place a mark now.
    pub fn is_local_turn(&self) -> bool {
        let local = match self.mode {
            Mode::LocalAi { .. } => HUMAN,
            Mode::Online { local } => local,
        };
        !self.outcome().is_terminal() && self.to_move() == local
    }

    /// Number of positions that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of positions that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Validates a move without applying it.
    fn check(&self, index: usize, symbol: Symbol) -> Result<Board, MoveError> {
        if self.outcome().is_terminal() {
            return Err(MoveError::GameOver);
        }
        self.board.apply_move(index, symbol)
    }

    /// Plays the human's move in local mode.
    ///
    /// Any redo history is discarded.
    #[instrument(skip(self))]
    pub fn play(&mut self, index: usize) -> Result<Outcome, SessionError> {
        if !matches!(self.mode, Mode::LocalAi { .. }) {
            return Err(SessionError::WrongMode);
        }
        let next = self.check(index, HUMAN)?;
        self.undo.push(self.board);
        self.redo.clear();
        self.board = next;
        debug!(index, outcome = %self.outcome(), "Human move applied");
        Ok(self.outcome())
    }

    /// Solver work for the computer's turn, if it is the computer's turn.
    pub fn pending_computer_turn(&self) -> Option<ComputerTurn> {
        match self.mode {
            Mode::LocalAi { difficulty }
                if !self.outcome().is_terminal() && self.to_move() == COMPUTER =>
            {
                Some(ComputerTurn {
                    board: self.board,
                    symbol: COMPUTER,
                    difficulty,
                })
            }
            _ => None,
        }
    }

    /// Applies a move computed for [`GameSession::pending_computer_turn`].
    #[instrument(skip(self))]
    pub fn apply_computer_move(&mut self, index: usize) -> Result<Outcome, SessionError> {
        if !matches!(self.mode, Mode::LocalAi { .. }) {
            return Err(SessionError::WrongMode);
        }
        self.board = self.check(index, COMPUTER)?;
        debug!(index, outcome = %self.outcome(), "Computer move applied");
        Ok(self.outcome())
    }

    /// Runs the solver inline and applies its move.
    ///
    /// Returns the chosen index, or `None` if it is not the computer's turn.
    pub fn computer_move<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<usize>, SessionError> {
        let Some(turn) = self.pending_computer_turn() else {
            return Ok(None);
        };
        let index = turn.solve(rng)?;
        self.apply_computer_move(index)?;
        Ok(Some(index))
    }

    /// Steps back to the previous position where the human was to move.
    ///
    /// Returns false when there is nothing to undo.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> bool {
        if !matches!(self.mode, Mode::LocalAi { .. }) {
            return false;
        }
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        self.redo.push(self.board);
        self.board = previous;
        debug!(remaining = self.undo.len(), "Undo");
        true
    }

    /// Re-applies the most recently undone round.
    ///
    /// Returns false when there is nothing to redo.
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> bool {
        if !matches!(self.mode, Mode::LocalAi { .. }) {
            return false;
        }
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push(self.board);
        self.board = next;
        debug!(remaining = self.redo.len(), "Redo");
        true
    }

    /// Checks a local move in online mode and returns it for sending.
    ///
    /// The board is not changed; wait for [`GameSession::confirm`].
    #[instrument(skip(self))]
    pub fn propose(&self, index: usize) -> Result<Move, SessionError> {
        let Mode::Online { local } = self.mode else {
            return Err(SessionError::WrongMode);
        };
        self.check(index, local)?;
        Ok(Move::new(index, local))
    }

    /// Applies a move the server broadcast, from either side.
    #[instrument(skip(self))]
    pub fn confirm(&mut self, index: usize, symbol: Symbol) -> Result<Outcome, SessionError> {
        if !matches!(self.mode, Mode::Online { .. }) {
            return Err(SessionError::WrongMode);
        }
        self.board = self.check(index, symbol).inspect_err(|e| {
            warn!(index, %symbol, error = %e, "Server-confirmed move does not fit local board");
        })?;
        Ok(self.outcome())
    }

    /// Replaces the board with the server's copy.
    #[instrument(skip(self, board))]
    pub fn sync(&mut self, board: Board) {
        debug!("Board synchronised from server");
        self.board = board;
    }

    /// Starts a fresh round in the same mode.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.undo.clear();
        self.redo.clear();
    }

    /// Changes the solver policy and starts a fresh round.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        match &mut self.mode {
            Mode::LocalAi { difficulty: current } => {
                *current = difficulty;
                self.reset();
                Ok(())
            }
            Mode::Online { .. } => Err(SessionError::WrongMode),
        }
    }
}
