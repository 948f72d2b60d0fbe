//! Room-scoped event fan-out for flight subscriptions.
//!
//! Each [`FlightKey`] has a room: the set of connections currently watching
//! that flight. Mutation handlers publish typed [`RoomEvent`]s into the
//! room's broadcast channel, and each member's socket task drains its own
//! receiver.
//!
//! # Delivery Semantics
//!
//! - Fire-and-forget: `publish` never blocks or fails the mutating caller,
//!   regardless of slow or absent receivers
//! - At-most-once per currently-connected member; nothing is replayed
//!   across reconnects or to members who join after the publish
//! - Per-room FIFO: the broadcast channel preserves publish order; no
//!   ordering across different rooms
//! - A lagging receiver drops its oldest backlog (bounded channel), it
//!   never exerts backpressure
//!
//! ```text
//! Client                Socket task                 RoomHub
//!   │                        │                         │
//!   ├─ join AI101/05-01 ────>│── join(conn, key) ─────>│  (membership + rx)
//!   │                        │                         │
//!   │                        │<── publish(key, ev) ────┤  (from a handler)
//!   │<─ event frame ─────────┤                         │
//! ```

use dcs_core::{FlightKey, RoomEvent};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Opaque identity of one WebSocket connection.
pub type ConnectionId = uuid::Uuid;

/// Capacity of each room's broadcast channel. A member that falls further
/// behind than this loses its oldest events rather than slowing the room.
const ROOM_CHANNEL_CAPACITY: usize = 256;

/// Type alias for the rooms map to reduce complexity.
type RoomsMap = Arc<RwLock<HashMap<FlightKey, broadcast::Sender<RoomEvent>>>>;

/// Room membership and event fan-out for flight subscriptions.
///
/// Cheaply cloneable; all clones share the same rooms and membership.
#[derive(Clone, Default)]
pub struct RoomHub {
    /// Map of flight key → broadcast channel for that room.
    rooms: RoomsMap,
    /// Map of connection → the set of rooms it has joined.
    members: Arc<RwLock<HashMap<ConnectionId, HashSet<FlightKey>>>>,
}

impl RoomHub {
    /// Create a hub with no rooms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a flight's room.
    ///
    /// Returns a receiver for the room's events, or `None` when the
    /// connection is already a member (repeat joins are no-ops).
    pub async fn join(
        &self,
        conn: ConnectionId,
        key: FlightKey,
    ) -> Option<broadcast::Receiver<RoomEvent>> {
        let mut members = self.members.write().await;
        if !members.entry(conn).or_default().insert(key.clone()) {
            return None;
        }
        drop(members);

        let mut rooms = self.rooms.write().await;
        let sender = rooms
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0);
        debug!(conn = %conn, key = %key, "connection joined room");
        Some(sender.subscribe())
    }

    /// Remove a connection from a flight's room. Safe to call for rooms the
    /// connection never joined.
    pub async fn leave(&self, conn: ConnectionId, key: &FlightKey) {
        let mut members = self.members.write().await;
        if let Some(joined) = members.get_mut(&conn) {
            if joined.remove(key) {
                debug!(conn = %conn, key = %key, "connection left room");
            }
        }
    }

    /// Remove a terminated connection from every room it had joined.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let mut members = self.members.write().await;
        if let Some(joined) = members.remove(&conn) {
            debug!(conn = %conn, rooms = joined.len(), "connection disconnected");
        }
    }

    /// Publish an event to every connection currently in `key`'s room.
    ///
    /// Fire-and-forget: a room nobody has ever joined swallows the event
    /// without allocating a channel, and slow receivers never block the
    /// caller.
    pub async fn publish(&self, key: &FlightKey, event: RoomEvent) {
        let rooms = self.rooms.read().await;
        let Some(sender) = rooms.get(key) else {
            return;
        };
        debug!(key = %key, event = event.name(), "publishing room event");
        let _ = sender.send(event);
    }

    /// Rooms a connection has joined (empty for unknown connections).
    pub async fn joined_rooms(&self, conn: ConnectionId) -> HashSet<FlightKey> {
        self.members
            .read()
            .await
            .get(&conn)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;
    use dcs_core::{Flight, FlightStatus};

    fn key() -> FlightKey {
        FlightKey::new("AI101", "2024-05-01")
    }

    fn changed() -> RoomEvent {
        RoomEvent::FlightsChanged {
            flight: Flight {
                flight_no: "AI101".to_string(),
                flight_date: "2024-05-01".to_string(),
                origin: String::new(),
                destination: String::new(),
                aircraft_type: String::new(),
                tail: String::new(),
                status: FlightStatus::open(),
            },
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_all_members() {
        let hub = RoomHub::new();
        let mut rx1 = hub.join(ConnectionId::new_v4(), key()).await.unwrap();
        let mut rx2 = hub.join(ConnectionId::new_v4(), key()).await.unwrap();

        hub.publish(&key(), changed()).await;

        assert_eq!(rx1.recv().await.unwrap(), changed());
        assert_eq!(rx2.recv().await.unwrap(), changed());
    }

    #[tokio::test]
    async fn test_repeat_join_is_a_no_op() {
        let hub = RoomHub::new();
        let conn = ConnectionId::new_v4();
        assert!(hub.join(conn, key()).await.is_some());
        assert!(hub.join(conn, key()).await.is_none());
        assert_eq!(hub.joined_rooms(conn).await.len(), 1);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let hub = RoomHub::new();
        let mut rx = hub
            .join(ConnectionId::new_v4(), FlightKey::new("AI102", "2024-05-01"))
            .await
            .unwrap();

        hub.publish(&key(), changed()).await;
        assert!(rx.try_recv().is_err(), "unrelated room must not receive");
    }

    #[tokio::test]
    async fn test_publish_to_empty_room_does_not_fail() {
        let hub = RoomHub::new();
        hub.publish(&key(), changed()).await;
    }

    #[tokio::test]
    async fn test_publish_to_unjoined_room_allocates_nothing() {
        let hub = RoomHub::new();
        hub.publish(&key(), changed()).await;
        assert!(hub.rooms.read().await.is_empty());

        let mut rx = hub.join(ConnectionId::new_v4(), key()).await.unwrap();
        assert!(rx.try_recv().is_err(), "nothing is replayed to late joiners");
    }

    #[tokio::test]
    async fn test_per_room_ordering_is_preserved() {
        let hub = RoomHub::new();
        let mut rx = hub.join(ConnectionId::new_v4(), key()).await.unwrap();

        hub.publish(&key(), RoomEvent::PaxCreated { passenger: None, imported: 1 })
            .await;
        hub.publish(&key(), RoomEvent::PaxCreated { passenger: None, imported: 2 })
            .await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            RoomEvent::PaxCreated { imported: 1, .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            RoomEvent::PaxCreated { imported: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_disconnect_clears_all_memberships() {
        let hub = RoomHub::new();
        let conn = ConnectionId::new_v4();
        hub.join(conn, key()).await.unwrap();
        hub.join(conn, FlightKey::new("AI102", "2024-05-01"))
            .await
            .unwrap();

        hub.disconnect(conn).await;
        assert!(hub.joined_rooms(conn).await.is_empty());

        // Idempotent for unknown connections too.
        hub.disconnect(conn).await;
        hub.leave(conn, &key()).await;
    }
}
