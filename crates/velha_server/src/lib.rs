//! Velha relay server.
//!
//! Pairs connections into two-player rooms, enforces turn order and move
//! legality on the server side, and relays moves, results and chat between
//! the two participants over a JSON WebSocket protocol.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod handler;
pub mod play;
pub mod protocol;
pub mod registry;
pub mod room;
pub mod transport;

pub use config::{ConfigError, PlayConfig, ServerConfig};
pub use protocol::{ClientEvent, ErrorCode, PlayerView, RoomSnapshot, ServerEvent, Stats};
pub use registry::{MatchStatus, Outbox, Registry, RegistryError, RegistryState};
pub use room::{ConnectionId, Participant, Room, RoomId};
pub use transport::router;
