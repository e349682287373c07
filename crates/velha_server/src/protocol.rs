//! Wire protocol: JSON events exchanged over the WebSocket.
//!
//! Every frame is `{"event": "<name>", "data": {...}}` with camelCase names.

use crate::room::{ConnectionId, RoomId};
use serde::{Deserialize, Serialize};
use velha_tictactoe::{Line, Outcome, Symbol, Winner};

/// Requests sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Join the wait queue or get paired immediately.
    FindMatch {
        /// Name shown to the opponent.
        display_name: String,
    },
    /// Claim a cell.
    MakeMove {
        /// Target room.
        room_id: RoomId,
        /// Cell index (0-8).
        index: usize,
        /// Symbol the sender plays.
        symbol: Symbol,
    },
    /// Client-reported end of round.
    CheckWinner {
        /// Target room.
        room_id: RoomId,
        /// Claimed result.
        winner: Winner,
    },
    /// Start a fresh round in the room.
    ResetGame {
        /// Target room.
        room_id: RoomId,
    },
    /// Leave the room.
    LeaveRoom {
        /// Target room.
        room_id: RoomId,
    },
    /// Relay a chat line to the room.
    ChatMessage {
        /// Target room.
        room_id: RoomId,
        /// Message text, relayed verbatim after trimming.
        text: String,
        /// Sender's display name.
        display_name: String,
    },
    /// Ask for server statistics.
    Stats,
}

/// Notifications sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// The requester is queued.
    Waiting,
    /// The requester was paired.
    MatchFound {
        /// New room.
        room_id: RoomId,
        /// Symbol assigned to the recipient.
        assigned_symbol: Symbol,
        /// The opponent's display name.
        opponent_name: String,
        /// Initial room state.
        state: RoomSnapshot,
    },
    /// A move was accepted.
    MoveMade {
        /// Claimed cell.
        index: usize,
        /// Symbol that moved.
        symbol: Symbol,
        /// Room state after the move.
        state: RoomSnapshot,
    },
    /// The round is over.
    GameEnded {
        /// Result of the round.
        winner: Winner,
        /// Completed line for a win.
        line: Option<Line>,
    },
    /// The room was reset.
    GameReset {
        /// Fresh room state.
        state: RoomSnapshot,
    },
    /// The opponent left the room.
    OpponentLeft,
    /// The opponent's connection dropped.
    OpponentDisconnected,
    /// A relayed chat line.
    ChatMessage {
        /// Message text, not to be interpreted as markup.
        text: String,
        /// Sender's display name.
        display_name: String,
        /// Sender's connection.
        sender_id: ConnectionId,
    },
    /// Server statistics.
    Stats(Stats),
    /// The recipient's last request was rejected.
    Error {
        /// Machine-readable reason.
        code: ErrorCode,
        /// Human-readable reason.
        message: String,
    },
}

/// Room state as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Cells in row-major order, `null` when empty.
    pub board: [Option<Symbol>; 9],
    /// Symbol on turn.
    pub current_turn: Symbol,
    /// False once the round has a result.
    pub active: bool,
    /// Server-side evaluation of the board.
    pub outcome: Outcome,
    /// Seated participants.
    pub players: Vec<PlayerView>,
}

/// A participant as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Connection identity.
    pub id: ConnectionId,
    /// Assigned symbol.
    pub symbol: Symbol,
    /// Display name.
    pub display_name: String,
}

/// Registry counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Rooms currently alive.
    pub active_rooms: usize,
    /// Connections in the wait queue.
    pub waiting_players: usize,
    /// Seated plus waiting connections.
    pub total_players: usize,
}

/// Machine-readable rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// Unknown or stale room id.
    RoomNotFound,
    /// Occupied cell, wrong turn, out of range or finished round.
    IllegalMove,
    /// The sender is not seated in the room.
    NotInRoom,
    /// The sender claimed a symbol it was not assigned.
    SymbolMismatch,
    /// The sender is already seated in a room.
    AlreadyInRoom,
    /// A reported result disagrees with the server's evaluation.
    DisputedResult,
    /// Malformed frame or empty field.
    InvalidRequest,
}
