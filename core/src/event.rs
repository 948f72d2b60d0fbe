//! Typed realtime events fanned out to a flight's room.
//!
//! Every successful mutation publishes one event to the room of the affected
//! [`FlightKey`](crate::FlightKey). Payloads carry full records, never diffs:
//! a viewer can always replace its local copy with the event payload.
//!
//! # Wire Format
//!
//! Events are internally tagged with a `name` field carrying the wire event
//! name:
//!
//! ```json
//! { "name": "pax:updated", "passenger": { "id": 7, "status": "CHECKED", ... } }
//! ```

use crate::types::{Flight, MovementRecord, Passenger};
use serde::{Deserialize, Serialize};

/// A realtime event delivered to every connection in the affected flight's
/// room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum RoomEvent {
    /// A flight was created, updated, or had its status changed.
    #[serde(rename = "flights:changed")]
    FlightsChanged {
        /// The full resulting flight record.
        flight: Flight,
    },
    /// One or more passengers were created. Interactive creation carries the
    /// new record; a batch import publishes once with the imported count and
    /// no individual record.
    #[serde(rename = "pax:created")]
    PaxCreated {
        /// The new passenger, for single interactive creation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        passenger: Option<Passenger>,
        /// Number of records created (1 for interactive creation).
        imported: usize,
    },
    /// A passenger lifecycle mutation (check-in, board, offload, bags).
    /// Carries the entire updated record.
    #[serde(rename = "pax:updated")]
    PaxUpdated {
        /// The full updated passenger record.
        passenger: Passenger,
    },
    /// A movement record was appended to the flight's log.
    #[serde(rename = "movement:new")]
    MovementNew {
        /// The appended record.
        movement: MovementRecord,
    },
}

impl RoomEvent {
    /// The wire event name (`flights:changed`, `pax:created`, `pax:updated`,
    /// `movement:new`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FlightsChanged { .. } => "flights:changed",
            Self::PaxCreated { .. } => "pax:created",
            Self::PaxUpdated { .. } => "pax:updated",
            Self::MovementNew { .. } => "movement:new",
        }
    }
}
