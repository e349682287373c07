//! Rooms: server-side state for one paired match.

use crate::protocol::{PlayerView, RoomSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use velha_tictactoe::{Board, MoveError, Outcome, Symbol};

/// Unique identifier for a transport connection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("conn#{}", _0)]
pub struct ConnectionId(pub u64);

/// Unique identifier for a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Builds the identifier for the `n`th room created by this process.
    pub fn numbered(n: u64) -> Self {
        Self(format!("room_{}", n))
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A connection seated in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// The participant's connection.
    pub id: ConnectionId,
    /// Symbol assigned at pairing.
    pub symbol: Symbol,
    /// Trimmed display name.
    pub display_name: String,
}

/// A paired match: up to two participants sharing one board.
///
/// `active` is false once the round has a result; a reset starts a fresh
/// round and makes the room active again.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    participants: Vec<Participant>,
    board: Board,
    turn: Symbol,
    active: bool,
}

impl Room {
    /// Creates an active room for two freshly paired participants.
    #[instrument(skip(x, o), fields(x = %x.id, o = %o.id))]
    pub fn new(id: RoomId, x: Participant, o: Participant) -> Self {
        debug!(room_id = %id, "Creating room");
        Self {
            id,
            participants: vec![x, o],
            board: Board::new(),
            turn: Symbol::X,
            active: true,
        }
    }

    /// Returns the room identifier.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Returns the seated participants, X first.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the symbol on turn.
    pub fn turn(&self) -> Symbol {
        self.turn
    }

    /// False once the current round has a result.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Looks up a seated participant.
    pub fn participant(&self, id: ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Whether `id` is seated here.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.participant(id).is_some()
    }

    /// True when nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Unseats `id`, returning the removed participant.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Participant> {
        let position = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(position))
    }

    /// Applies a move for `symbol`, flips the turn and re-evaluates the board.
    ///
    /// A terminal result ends the round. Nothing changes on error.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn apply_move(&mut self, index: usize, symbol: Symbol) -> Result<Outcome, MoveError> {
        if !self.active {
            return Err(MoveError::GameOver);
        }
        if symbol != self.turn {
            return Err(MoveError::WrongTurn {
                expected: self.turn,
                actual: symbol,
            });
        }

        self.board = self.board.apply_move(index, symbol)?;
        self.turn = symbol.opponent();

        let outcome = self.board.evaluate();
        if outcome.is_terminal() {
            debug!(%outcome, "Round finished");
            self.active = false;
        }
        Ok(outcome)
    }

    /// Marks the current round as finished.
    pub fn end_round(&mut self) {
        self.active = false;
    }

    /// Clears the board and starts a new round with X to move.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.turn = Symbol::X;
        self.active = true;
    }

    /// Wire representation of the room state.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            board: self.board.marks(),
            current_turn: self.turn,
            active: self.active,
            outcome: self.board.evaluate(),
            players: self
                .participants
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    symbol: p.symbol,
                    display_name: p.display_name.clone(),
                })
                .collect(),
        }
    }
}
