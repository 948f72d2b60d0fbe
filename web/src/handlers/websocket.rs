//! WebSocket endpoint for per-flight realtime rooms.
//!
//! Clients connect once and join any number of flight rooms; mutations on a
//! joined flight arrive as event frames. Membership lives for the lifetime
//! of the connection and is dropped when the socket terminates.
//!
//! # Message Protocol
//!
//! **Client → Server:**
//! ```json
//! { "type": "join",  "flight_no": "AI101", "flight_date": "2024-05-01" }
//! { "type": "leave", "flight_no": "AI101", "flight_date": "2024-05-01" }
//! { "type": "ping" }
//! ```
//!
//! **Server → Client:**
//! ```json
//! { "type": "joined", "key": "AI1012024-05-01" }
//! { "type": "event",  "key": "AI1012024-05-01",
//!   "event": { "name": "pax:updated", "passenger": { ... } } }
//! { "type": "error",  "message": "..." }
//! ```

use crate::hub::ConnectionId;
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use dcs_core::{FlightKey, RoomEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

/// How often pending room events are drained to the socket.
const DRAIN_INTERVAL_MS: u64 = 50;

/// WebSocket message from client to server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Join a flight's room (repeat joins are no-ops).
    Join {
        /// Flight number.
        flight_no: String,
        /// Flight date.
        flight_date: String,
    },
    /// Leave a flight's room (safe for rooms never joined).
    Leave {
        /// Flight number.
        flight_no: String,
        /// Flight date.
        flight_date: String,
    },
    /// Keep-alive.
    Ping,
}

/// WebSocket message from server to client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    /// Join confirmation.
    Joined {
        /// Canonical key of the joined room.
        key: FlightKey,
    },
    /// Leave confirmation.
    Left {
        /// Canonical key of the left room.
        key: FlightKey,
    },
    /// A room event for a joined flight.
    Event {
        /// Canonical key of the room the event belongs to.
        key: FlightKey,
        /// The typed event payload (full records, never diffs).
        event: RoomEvent,
    },
    /// An unparseable client frame.
    Error {
        /// Error description.
        message: String,
    },
    /// Keep-alive response.
    Pong,
}

/// WebSocket endpoint for realtime flight rooms.
#[allow(clippy::unused_async)] // Axum handler signature requires async
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one connection: route client frames to the hub, drain joined
/// rooms' events to the socket, and clear membership on termination.
#[allow(clippy::cognitive_complexity)] // WebSocket event loops are naturally branchy
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let conn = ConnectionId::new_v4();
    info!(conn = %conn, "WebSocket connection established");

    // Receivers for the rooms this connection has joined.
    let mut receivers: HashMap<FlightKey, broadcast::Receiver<RoomEvent>> = HashMap::new();
    let mut drain = interval(Duration::from_millis(DRAIN_INTERVAL_MS));

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if handle_client_frame(&mut socket, &state, conn, &mut receivers, &text)
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(conn = %conn, "client closed connection");
                        break;
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        debug!(conn = %conn, "keep-alive frame");
                    }
                    Some(Ok(Message::Binary(_))) => {
                        warn!(conn = %conn, "unexpected binary frame");
                    }
                    Some(Err(e)) => {
                        warn!(conn = %conn, error = %e, "socket error");
                        break;
                    }
                }
            }
            _ = drain.tick() => {
                if drain_rooms(&mut socket, &mut receivers).await.is_err() {
                    break;
                }
            }
        }
    }

    state.hub.disconnect(conn).await;
    info!(conn = %conn, "WebSocket connection closed");
}

/// Parse and act on one text frame. `Err` means the socket is gone.
async fn handle_client_frame(
    socket: &mut WebSocket,
    state: &AppState,
    conn: ConnectionId,
    receivers: &mut HashMap<FlightKey, broadcast::Receiver<RoomEvent>>,
    text: &str,
) -> Result<(), ()> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Join {
            flight_no,
            flight_date,
        }) => {
            let key = FlightKey::new(&flight_no, &flight_date);
            if let Some(rx) = state.hub.join(conn, key.clone()).await {
                receivers.insert(key.clone(), rx);
            }
            send_json(socket, &ServerMessage::Joined { key }).await
        }
        Ok(ClientMessage::Leave {
            flight_no,
            flight_date,
        }) => {
            let key = FlightKey::new(&flight_no, &flight_date);
            state.hub.leave(conn, &key).await;
            receivers.remove(&key);
            send_json(socket, &ServerMessage::Left { key }).await
        }
        Ok(ClientMessage::Ping) => send_json(socket, &ServerMessage::Pong).await,
        Err(e) => {
            error!(conn = %conn, error = %e, "failed to parse client frame");
            send_json(
                socket,
                &ServerMessage::Error {
                    message: format!("unrecognized message: {e}"),
                },
            )
            .await
        }
    }
}

/// Forward every pending event from joined rooms. `Err` means the socket is
/// gone.
async fn drain_rooms(
    socket: &mut WebSocket,
    receivers: &mut HashMap<FlightKey, broadcast::Receiver<RoomEvent>>,
) -> Result<(), ()> {
    for (key, rx) in receivers.iter_mut() {
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    send_json(
                        socket,
                        &ServerMessage::Event {
                            key: key.clone(),
                            event,
                        },
                    )
                    .await?;
                }
                Err(
                    broadcast::error::TryRecvError::Empty
                    | broadcast::error::TryRecvError::Closed,
                ) => break,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(key = %key, skipped, "client lagging, skipped events");
                }
            }
        }
    }
    Ok(())
}

/// Serialize and send one frame. `Err` means the client disconnected.
async fn send_json(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), ()> {
    match serde_json::to_string(message) {
        Ok(json) => socket.send(Message::Text(json)).await.map_err(|_| ()),
        Err(e) => {
            error!(error = %e, "failed to serialize server frame");
            Ok(())
        }
    }
}
