//! # DCS Core
//!
//! Domain core for a lightweight in-memory departure control system (DCS):
//! flight records, passenger manifests, check-in / boarding / offload
//! transitions, baggage counts, and ground-movement logs, all scoped per
//! (flight number, flight date) pair.
//!
//! ## Core Concepts
//!
//! - **`FlightKey`**: canonical composite identity derived from a normalized
//!   flight number plus flight date
//! - **`RecordStore`**: the single shared in-memory store, constructed once
//!   at process start and handed to all consumers
//! - **Passenger lifecycle**: OPEN → CHECKED → BOARDED → OPEN (offload),
//!   with flight-status guards
//! - **`RoomEvent`**: typed realtime events published to the room watching
//!   the affected flight
//!
//! ## Architecture Principles
//!
//! - All state is process memory; a restart discards everything
//! - Every read-modify-write over a flight's passenger list or movement log
//!   runs as one uninterrupted critical section
//! - Errors are local to the operation boundary; no request can take the
//!   process down
//!
//! ## Example
//!
//! ```ignore
//! use dcs_core::{RecordStore, FlightUpsert};
//!
//! let store = RecordStore::new();
//! let flight = store.upsert_flight(FlightUpsert {
//!     flight_no: "ai101".into(),
//!     flight_date: "2024-05-01".into(),
//!     ..FlightUpsert::default()
//! }).await?;
//! assert_eq!(flight.status.as_str(), "OPEN");
//! ```

pub mod error;
pub mod event;
pub mod import;
pub mod key;
pub mod lifecycle;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use event::RoomEvent;
pub use key::FlightKey;
pub use store::RecordStore;
pub use types::{
    Flight, FlightStatus, FlightUpsert, MovementDraft, MovementRecord, Passenger, PassengerDraft,
    PaxStatus,
};
