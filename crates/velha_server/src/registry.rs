//! Room registry and matchmaker.
//!
//! All rooms, the wait queue and the per-connection outboxes live in one
//! [`RegistryState`] behind a single lock, so every request is applied
//! atomically and events from one operation are enqueued before the next
//! operation starts.

use crate::protocol::{ErrorCode, ServerEvent, Stats};
use crate::room::{ConnectionId, Participant, Room, RoomId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use velha_tictactoe::{MoveError, Outcome, Symbol, Winner};

/// Receiving half of a connection's outbox.
pub type Outbox = mpsc::UnboundedReceiver<ServerEvent>;

/// Reasons a registry request is rejected.
///
/// Rejections are reported to the requester only and never change state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RegistryError {
    /// No room with this id.
    #[display("Room {} not found", _0)]
    RoomNotFound(RoomId),
    /// The board rejected the move.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),
    /// The requester is not seated in the room.
    #[display("Not a participant of room {}", _0)]
    NotInRoom(RoomId),
    /// The requester claimed a symbol it was not assigned.
    #[display("You play {}, not {}", assigned, claimed)]
    SymbolMismatch {
        /// Symbol assigned at pairing.
        assigned: Symbol,
        /// Symbol in the request.
        claimed: Symbol,
    },
    /// The requester is already seated in a room.
    #[display("Already playing in room {}", _0)]
    AlreadyInRoom(RoomId),
    /// A match request had a blank display name.
    #[display("Display name must not be empty")]
    EmptyDisplayName,
    /// A chat message was blank.
    #[display("Chat message must not be empty")]
    EmptyChatMessage,
    /// A reported result disagrees with the board.
    #[display("Reported result {} does not match the board", claimed)]
    DisputedResult {
        /// Result reported by the client.
        claimed: Winner,
    },
    /// The frame could not be decoded.
    #[display("Malformed request: {}", _0)]
    Malformed(String),
}

impl std::error::Error for RegistryError {}

impl From<MoveError> for RegistryError {
    fn from(error: MoveError) -> Self {
        Self::IllegalMove(error)
    }
}

impl RegistryError {
    /// Wire code for this rejection.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RoomNotFound(_) => ErrorCode::RoomNotFound,
            Self::IllegalMove(_) => ErrorCode::IllegalMove,
            Self::NotInRoom(_) => ErrorCode::NotInRoom,
            Self::SymbolMismatch { .. } => ErrorCode::SymbolMismatch,
            Self::AlreadyInRoom(_) => ErrorCode::AlreadyInRoom,
            Self::DisputedResult { .. } => ErrorCode::DisputedResult,
            Self::EmptyDisplayName | Self::EmptyChatMessage | Self::Malformed(_) => {
                ErrorCode::InvalidRequest
            }
        }
    }
}

/// Result of a match request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    /// The requester is queued.
    Waiting,
    /// The requester was paired into a new room.
    Paired(RoomId),
}

#[derive(Debug, Clone)]
struct Waiting {
    id: ConnectionId,
    display_name: String,
}

/// Sending halves of every open connection's outbox.
#[derive(Debug, Default)]
struct Outboxes(HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>);

impl Outboxes {
    fn send(&self, to: ConnectionId, event: ServerEvent) {
        match self.0.get(&to) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    debug!(connection_id = %to, "Outbox closed, dropping event");
                }
            }
            None => debug!(connection_id = %to, "No outbox, dropping event"),
        }
    }

    fn broadcast(&self, room: &Room, event: ServerEvent) {
        for participant in room.participants() {
            self.send(participant.id, event.clone());
        }
    }
}

/// Rooms, wait queue and outboxes.
#[derive(Debug, Default)]
pub struct RegistryState {
    rooms: HashMap<RoomId, Room>,
    queue: VecDeque<Waiting>,
    outboxes: Outboxes,
    next_connection: u64,
    next_room: u64,
}

impl RegistryState {
    /// Registers a new connection and returns its outbox.
    #[instrument(skip(self))]
    pub fn connect(&mut self) -> (ConnectionId, Outbox) {
        self.next_connection += 1;
        let id = ConnectionId(self.next_connection);
        let (tx, rx) = mpsc::unbounded_channel();
        self.outboxes.0.insert(id, tx);
        info!(connection_id = %id, "Connection opened");
        (id, rx)
    }

    /// Room the connection is seated in, if any.
    pub fn room_of(&self, id: ConnectionId) -> Option<&Room> {
        self.rooms.values().find(|room| room.contains(id))
    }

    /// Looks up a room.
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Whether the connection is in the wait queue.
    pub fn is_waiting(&self, id: ConnectionId) -> bool {
        self.queue.iter().any(|w| w.id == id)
    }

    /// Pairs the requester with the longest-waiting connection or queues it.
    ///
    /// The earlier arrival plays X. A repeated request while queued only
    /// re-sends `waiting`.
    #[instrument(skip(self))]
    pub fn request_match(
        &mut self,
        requester: ConnectionId,
        display_name: &str,
    ) -> Result<MatchStatus, RegistryError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(RegistryError::EmptyDisplayName);
        }
        if let Some(room) = self.room_of(requester) {
            return Err(RegistryError::AlreadyInRoom(room.id().clone()));
        }
        if self.is_waiting(requester) {
            debug!(connection_id = %requester, "Already queued");
            self.outboxes.send(requester, ServerEvent::Waiting);
            return Ok(MatchStatus::Waiting);
        }

        let Some(first) = self.queue.pop_front() else {
            self.queue.push_back(Waiting {
                id: requester,
                display_name: display_name.to_string(),
            });
            info!(connection_id = %requester, queued = self.queue.len(), "Waiting for opponent");
            self.outboxes.send(requester, ServerEvent::Waiting);
            return Ok(MatchStatus::Waiting);
        };

        self.next_room += 1;
        let room_id = RoomId::numbered(self.next_room);
        let x = Participant {
            id: first.id,
            symbol: Symbol::X,
            display_name: first.display_name,
        };
        let o = Participant {
            id: requester,
            symbol: Symbol::O,
            display_name: display_name.to_string(),
        };
        let room = Room::new(room_id.clone(), x.clone(), o.clone());
        let state = room.snapshot();

        info!(%room_id, x = %x.id, o = %o.id, "Match found");
        for (me, opponent) in [(&x, &o), (&o, &x)] {
            self.outboxes.send(
                me.id,
                ServerEvent::MatchFound {
                    room_id: room_id.clone(),
                    assigned_symbol: me.symbol,
                    opponent_name: opponent.display_name.clone(),
                    state: state.clone(),
                },
            );
        }
        self.rooms.insert(room_id.clone(), room);
        Ok(MatchStatus::Paired(room_id))
    }

    /// Applies a move for a seated participant and broadcasts it.
    ///
    /// When the move ends the round, `gameEnded` follows `moveMade`.
    #[instrument(skip(self))]
    pub fn submit_move(
        &mut self,
        sender: ConnectionId,
        room_id: &RoomId,
        index: usize,
        symbol: Symbol,
    ) -> Result<Outcome, RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.clone()))?;
        let participant = room
            .participant(sender)
            .ok_or_else(|| RegistryError::NotInRoom(room_id.clone()))?;
        if participant.symbol != symbol {
            return Err(RegistryError::SymbolMismatch {
                assigned: participant.symbol,
                claimed: symbol,
            });
        }

        let outcome = room.apply_move(index, symbol)?;
        debug!(%room_id, index, %symbol, "Move accepted");
        self.outboxes.broadcast(
            room,
            ServerEvent::MoveMade {
                index,
                symbol,
                state: room.snapshot(),
            },
        );
        if let Some(winner) = outcome.verdict() {
            info!(%room_id, %winner, "Round ended");
            self.outboxes.broadcast(room, game_ended(winner, &outcome));
        }
        Ok(outcome)
    }

    /// Accepts a client-reported result if it matches the board.
    ///
    /// Rooms end their round as soon as a terminal move lands, so an agreeing
    /// report is normally a no-op. It only broadcasts when the room is still
    /// marked active.
    #[instrument(skip(self))]
    pub fn report_result(
        &mut self,
        sender: ConnectionId,
        room_id: &RoomId,
        claimed: Winner,
    ) -> Result<(), RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.clone()))?;
        if !room.contains(sender) {
            return Err(RegistryError::NotInRoom(room_id.clone()));
        }

        let outcome = room.board().evaluate();
        if outcome.verdict() != Some(claimed) {
            return Err(RegistryError::DisputedResult { claimed });
        }
        if room.is_active() {
            room.end_round();
            info!(%room_id, winner = %claimed, "Round ended by report");
            self.outboxes.broadcast(room, game_ended(claimed, &outcome));
        } else {
            debug!(%room_id, "Result already recorded");
        }
        Ok(())
    }

    /// Clears the room's board and broadcasts the fresh state.
    #[instrument(skip(self))]
    pub fn reset_room(&mut self, sender: ConnectionId, room_id: &RoomId) -> Result<(), RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.clone()))?;
        if !room.contains(sender) {
            return Err(RegistryError::NotInRoom(room_id.clone()));
        }

        room.reset();
        info!(%room_id, "Room reset");
        self.outboxes.broadcast(
            room,
            ServerEvent::GameReset {
                state: room.snapshot(),
            },
        );
        Ok(())
    }

    /// Unseats the sender; the room is destroyed once empty.
    #[instrument(skip(self))]
    pub fn leave_room(&mut self, sender: ConnectionId, room_id: &RoomId) -> Result<(), RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.clone()))?;
        if room.remove(sender).is_none() {
            return Err(RegistryError::NotInRoom(room_id.clone()));
        }

        info!(%room_id, connection_id = %sender, "Left room");
        self.outboxes.broadcast(room, ServerEvent::OpponentLeft);
        if room.is_empty() {
            self.rooms.remove(room_id);
            info!(%room_id, "Room destroyed");
        }
        Ok(())
    }

    /// Relays a chat line to every participant, sender included.
    #[instrument(skip(self, text))]
    pub fn relay_chat(
        &mut self,
        sender: ConnectionId,
        room_id: &RoomId,
        text: &str,
        display_name: &str,
    ) -> Result<(), RegistryError> {
        let room = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.clone()))?;
        let participant = room
            .participant(sender)
            .ok_or_else(|| RegistryError::NotInRoom(room_id.clone()))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(RegistryError::EmptyChatMessage);
        }
        let display_name = match display_name.trim() {
            "" => participant.display_name.clone(),
            name => name.to_string(),
        };

        debug!(%room_id, connection_id = %sender, "Relaying chat");
        self.outboxes.broadcast(
            room,
            ServerEvent::ChatMessage {
                text: text.to_string(),
                display_name,
                sender_id: sender,
            },
        );
        Ok(())
    }

    /// Forgets a closed connection and notifies anyone it was playing.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, id: ConnectionId) {
        self.outboxes.0.remove(&id);
        self.queue.retain(|w| w.id != id);

        let seated: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.contains(id))
            .map(|room| room.id().clone())
            .collect();
        for room_id in seated {
            if let Some(room) = self.rooms.get_mut(&room_id) {
                room.remove(id);
                self.outboxes.broadcast(room, ServerEvent::OpponentDisconnected);
                if room.is_empty() {
                    self.rooms.remove(&room_id);
                    info!(%room_id, "Room destroyed");
                }
            }
        }
        info!(connection_id = %id, "Connection closed");
    }

    /// Current counters.
    pub fn stats(&self) -> Stats {
        let seated: usize = self.rooms.values().map(|r| r.participants().len()).sum();
        Stats {
            active_rooms: self.rooms.len(),
            waiting_players: self.queue.len(),
            total_players: seated + self.queue.len(),
        }
    }

    /// Sends the current counters to one connection.
    pub fn send_stats(&self, to: ConnectionId) {
        self.outboxes.send(to, ServerEvent::Stats(self.stats()));
    }

    /// Reports a rejection to the requester only.
    pub fn notify_error(&self, to: ConnectionId, error: &RegistryError) {
        warn!(connection_id = %to, code = ?error.code(), %error, "Request rejected");
        self.outboxes.send(
            to,
            ServerEvent::Error {
                code: error.code(),
                message: error.to_string(),
            },
        );
    }
}

fn game_ended(winner: Winner, outcome: &Outcome) -> ServerEvent {
    let line = match outcome {
        Outcome::Win { line, .. } => Some(*line),
        _ => None,
    };
    ServerEvent::GameEnded { winner, line }
}

/// Shared handle to the registry.
///
/// Cloning is cheap; every clone sees the same state.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    state: Arc<Mutex<RegistryState>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the state for one atomic operation.
    pub fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`RegistryState::connect`].
    pub fn connect(&self) -> (ConnectionId, Outbox) {
        self.lock().connect()
    }

    /// See [`RegistryState::request_match`].
    pub fn request_match(
        &self,
        requester: ConnectionId,
        display_name: &str,
    ) -> Result<MatchStatus, RegistryError> {
        self.lock().request_match(requester, display_name)
    }

    /// See [`RegistryState::submit_move`].
    pub fn submit_move(
        &self,
        sender: ConnectionId,
        room_id: &RoomId,
        index: usize,
        symbol: Symbol,
    ) -> Result<Outcome, RegistryError> {
        self.lock().submit_move(sender, room_id, index, symbol)
    }

    /// See [`RegistryState::report_result`].
    pub fn report_result(
        &self,
        sender: ConnectionId,
        room_id: &RoomId,
        claimed: Winner,
    ) -> Result<(), RegistryError> {
        self.lock().report_result(sender, room_id, claimed)
    }

    /// See [`RegistryState::reset_room`].
    pub fn reset_room(&self, sender: ConnectionId, room_id: &RoomId) -> Result<(), RegistryError> {
        self.lock().reset_room(sender, room_id)
    }

    /// See [`RegistryState::leave_room`].
    pub fn leave_room(&self, sender: ConnectionId, room_id: &RoomId) -> Result<(), RegistryError> {
        self.lock().leave_room(sender, room_id)
    }

    /// See [`RegistryState::relay_chat`].
    pub fn relay_chat(
        &self,
        sender: ConnectionId,
        room_id: &RoomId,
        text: &str,
        display_name: &str,
    ) -> Result<(), RegistryError> {
        self.lock().relay_chat(sender, room_id, text, display_name)
    }

    /// See [`RegistryState::disconnect`].
    pub fn disconnect(&self, id: ConnectionId) {
        self.lock().disconnect(id)
    }

    /// See [`RegistryState::stats`].
    pub fn stats(&self) -> Stats {
        self.lock().stats()
    }

    /// See [`RegistryState::send_stats`].
    pub fn send_stats(&self, to: ConnectionId) {
        self.lock().send_stats(to)
    }

    /// See [`RegistryState::notify_error`].
    pub fn notify_error(&self, to: ConnectionId, error: &RegistryError) {
        self.lock().notify_error(to, error)
    }
}
