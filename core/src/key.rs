//! Canonical composite keys for flight-date pairs.
//!
//! A [`FlightKey`] is the sole identity for a flight record, its passenger
//! list, its movement log, and its realtime room. Two requests with equal
//! (flight number, flight date) pairs after normalization always resolve to
//! the same key, case-insensitively on the flight number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identity for a flight-date pair.
///
/// Derived as `uppercase(trim(flight_no)) + trim(flight_date)`, so
/// `("ai101", "2024-05-01")` and `("AI101", "2024-05-01")` are the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightKey(String);

impl FlightKey {
    /// Derive the canonical key from a flight number and flight date.
    #[must_use]
    pub fn new(flight_no: &str, flight_date: &str) -> Self {
        Self(format!(
            "{}{}",
            flight_no.trim().to_uppercase(),
            flight_date.trim()
        ))
    }

    /// The canonical key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
