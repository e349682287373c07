//! Decodes client frames and routes them to the registry.

use crate::protocol::ClientEvent;
use crate::registry::{Registry, RegistryError};
use crate::room::ConnectionId;
use tracing::{debug, instrument, warn};

/// Handles one text frame from `sender`.
///
/// Frames that do not decode are answered with an `invalidRequest` error.
#[instrument(skip(registry, frame), fields(len = frame.len()))]
pub fn handle_frame(registry: &Registry, sender: ConnectionId, frame: &str) {
    match serde_json::from_str::<ClientEvent>(frame) {
        Ok(event) => dispatch(registry, sender, event),
        Err(e) => {
            warn!(connection_id = %sender, error = %e, "Malformed frame");
            registry.notify_error(sender, &RegistryError::Malformed(e.to_string()));
        }
    }
}

/// Applies a decoded request, reporting any rejection to `sender` only.
pub fn dispatch(registry: &Registry, sender: ConnectionId, event: ClientEvent) {
    debug!(connection_id = %sender, ?event, "Dispatching");
    let result = match event {
        ClientEvent::FindMatch { display_name } => {
            registry.request_match(sender, &display_name).map(drop)
        }
        ClientEvent::MakeMove {
            room_id,
            index,
            symbol,
        } => registry.submit_move(sender, &room_id, index, symbol).map(drop),
        ClientEvent::CheckWinner { room_id, winner } => {
            registry.report_result(sender, &room_id, winner)
        }
        ClientEvent::ResetGame { room_id } => registry.reset_room(sender, &room_id),
        ClientEvent::LeaveRoom { room_id } => registry.leave_room(sender, &room_id),
        ClientEvent::ChatMessage {
            room_id,
            text,
            display_name,
        } => registry.relay_chat(sender, &room_id, &text, &display_name),
        ClientEvent::Stats => {
            registry.send_stats(sender);
            Ok(())
        }
    };

    if let Err(error) = result {
        registry.notify_error(sender, &error);
    }
}
