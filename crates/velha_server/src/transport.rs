//! HTTP and WebSocket surface.

use crate::handler::handle_frame;
use crate::protocol::Stats;
use crate::registry::Registry;
use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info, instrument};

/// Builds the application router.
///
/// - `GET /ws`: game socket
/// - `GET /api/stats`: registry counters as JSON
/// - `GET /health`: liveness probe
pub fn router(registry: Registry) -> Router {
    Router::new()
        .route("/ws", get(upgrade))
        .route("/api/stats", get(stats))
        .route("/health", get(health))
        .with_state(registry)
}

async fn health() -> &'static str {
    "ok"
}

async fn stats(State(registry): State<Registry>) -> Json<Stats> {
    Json(registry.stats())
}

async fn upgrade(ws: WebSocketUpgrade, State(registry): State<Registry>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, registry))
}

/// Runs one connection: a writer task drains the outbox while this task
/// reads frames until the peer goes away.
#[instrument(skip_all)]
async fn serve_socket(socket: WebSocket, registry: Registry) {
    let (connection_id, mut outbox) = registry.connect();
    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!(error = %e, "Failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                debug!("Socket closed while sending");
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => handle_frame(&registry, connection_id, text.as_str()),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(%connection_id, error = %e, "Socket read failed");
                break;
            }
        }
    }

    // Dropping the outbox sender ends the writer once queued events flush.
    registry.disconnect(connection_id);
    if let Err(e) = writer.await {
        error!(%connection_id, error = %e, "Writer task failed");
    }
    info!(%connection_id, "Socket finished");
}
