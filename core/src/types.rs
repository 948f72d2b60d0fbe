//! Domain record types: flights, passengers, movement log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a flight.
///
/// Flight statuses are an open-ended set of uppercase tokens; `OPEN`, `PD`,
/// and `CLOSED` are the well-known values, and only the `PD` guard (blocks
/// passenger check-in) is load-bearing. Unknown tokens are stored as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightStatus(String);

impl FlightStatus {
    /// Normalize a raw status token (trimmed, uppercased).
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }

    /// The `OPEN` status, assigned to every newly created flight.
    #[must_use]
    pub fn open() -> Self {
        Self("OPEN".to_string())
    }

    /// Whether this flight is in the PD hold state, which blocks check-in.
    #[must_use]
    pub fn is_pd(&self) -> bool {
        self.0 == "PD"
    }

    /// The status token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FlightStatus {
    fn default() -> Self {
        Self::open()
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flight record, identified by its [`FlightKey`](crate::FlightKey).
///
/// Created implicitly on first reference to its key; fields are upsert-merged
/// on repeated creation calls (a provided field overwrites, an absent field
/// preserves the prior value).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Flight number, normalized uppercase (e.g. "AI101").
    pub flight_no: String,
    /// Flight date (e.g. "2024-05-01").
    pub flight_date: String,
    /// Origin station code.
    pub origin: String,
    /// Destination station code.
    pub destination: String,
    /// Aircraft type designator.
    pub aircraft_type: String,
    /// Tail registration.
    pub tail: String,
    /// Operational status.
    pub status: FlightStatus,
}

/// Partial flight fields for create-or-merge calls.
///
/// `flight_no` and `flight_date` are required; every other field overwrites
/// the stored value only when present.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlightUpsert {
    /// Flight number (required).
    pub flight_no: String,
    /// Flight date (required).
    pub flight_date: String,
    /// Origin station code, if provided.
    pub origin: Option<String>,
    /// Destination station code, if provided.
    pub destination: Option<String>,
    /// Aircraft type designator, if provided.
    pub aircraft_type: Option<String>,
    /// Tail registration, if provided.
    pub tail: Option<String>,
    /// Status token, if provided.
    pub status: Option<String>,
}

/// Lifecycle status of a passenger within a flight's list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaxStatus {
    /// Not checked in (initial state, and the result of an offload).
    Open,
    /// Checked in.
    Checked,
    /// Boarded.
    Boarded,
}

/// A passenger record, owned exclusively by one flight's list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Process-unique monotonic id; the public lookup key for lifecycle
    /// operations.
    pub id: u64,
    /// Owning flight number.
    pub flight_no: String,
    /// Owning flight date.
    pub flight_date: String,
    /// Surname.
    pub surname: String,
    /// Given name.
    pub given: String,
    /// Booking reference.
    pub pnr: String,
    /// Passport number.
    pub passport_no: String,
    /// Assigned seat; cleared on offload.
    pub seat: String,
    /// Lifecycle status.
    pub status: PaxStatus,
    /// Zero-padded ordinal assigned once at creation (list length + 1);
    /// never renumbered.
    pub sequence_no: String,
    /// Number of checked bags.
    pub bag_count: u32,
    /// Whether the passenger has boarded; cleared on offload.
    pub boarded: bool,
    /// Free-text comment.
    pub comment: String,
    /// Whether this record is an infant.
    pub is_infant: bool,
}

/// Partial passenger fields for interactive creation.
///
/// `surname` is required; everything else defaults to empty / false.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PassengerDraft {
    /// Surname (required).
    pub surname: String,
    /// Given name.
    pub given: String,
    /// Booking reference.
    pub pnr: String,
    /// Passport number.
    pub passport_no: String,
    /// Assigned seat.
    pub seat: String,
    /// Free-text comment.
    pub comment: String,
    /// Whether this record is an infant.
    pub is_infant: bool,
}

/// A ground-movement log entry; append-only, never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    /// Off-blocks time.
    pub off: String,
    /// Actual time departed.
    pub atd: String,
    /// Actual time arrived.
    pub ata: String,
    /// Free-text remark.
    pub remark: String,
    /// Server-side timestamp assigned at append.
    pub timestamp: DateTime<Utc>,
}

/// Fields for a movement log append; the timestamp is assigned by the store.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovementDraft {
    /// Off-blocks time.
    pub off: String,
    /// Actual time departed.
    pub atd: String,
    /// Actual time arrived.
    pub ata: String,
    /// Free-text remark.
    pub remark: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_flight_status_normalizes() {
        assert_eq!(FlightStatus::new(" pd ").as_str(), "PD");
        assert!(FlightStatus::new("pd").is_pd());
        assert!(!FlightStatus::new("open").is_pd());
    }

    #[test]
    fn test_flight_status_defaults_to_open() {
        assert_eq!(FlightStatus::default().as_str(), "OPEN");
    }

    #[test]
    fn test_open_ended_status_tokens_pass_through() {
        assert_eq!(FlightStatus::new("airborne").as_str(), "AIRBORNE");
    }

    #[test]
    fn test_pax_status_wire_format() {
        let json = serde_json::to_string(&PaxStatus::Checked).unwrap();
        assert_eq!(json, "\"CHECKED\"");
        let back: PaxStatus = serde_json::from_str("\"BOARDED\"").unwrap();
        assert_eq!(back, PaxStatus::Boarded);
    }
}
