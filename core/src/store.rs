//! The in-memory record store.
//!
//! One [`RecordStore`] is constructed at process start and shared (via
//! `Arc`) by every consumer; there are no ambient globals, so tests get
//! isolation from fresh instances.
//!
//! # Concurrency
//!
//! All maps live behind a single `tokio::sync::RwLock`. Every
//! read-modify-write sequence over a flight's passenger list or movement log
//! (including the list-length read that assigns a sequence number) runs
//! under one write guard with no `.await` inside the critical section, so
//! concurrent requests can never interleave within a mutation.

use crate::error::StoreError;
use crate::key::FlightKey;
use crate::types::{
    Flight, FlightStatus, FlightUpsert, MovementDraft, MovementRecord, Passenger, PassengerDraft,
    PaxStatus,
};
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Everything the store knows about one flight-date pair.
#[derive(Debug)]
pub(crate) struct FlightEntry {
    pub(crate) flight: Flight,
    pub(crate) passengers: Vec<Passenger>,
    pub(crate) movements: Vec<MovementRecord>,
}

#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    pub(crate) flights: HashMap<FlightKey, FlightEntry>,
    /// Insertion order of keys; `list_flights` callers must treat the
    /// result as a set, but a stable default order keeps output readable.
    order: Vec<FlightKey>,
}

impl StoreInner {
    /// Create the entry for a key if absent and return it. The atomicity
    /// unit: callers hold the write guard for the whole mutation.
    pub(crate) fn ensure_entry(
        &mut self,
        flight_no: &str,
        flight_date: &str,
    ) -> (FlightKey, &mut FlightEntry) {
        let key = FlightKey::new(flight_no, flight_date);
        let entry = match self.flights.entry(key.clone()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                debug!(key = %key, "flight created");
                self.order.push(key.clone());
                vacant.insert(FlightEntry {
                    flight: Flight {
                        flight_no: flight_no.trim().to_uppercase(),
                        flight_date: flight_date.trim().to_string(),
                        origin: String::new(),
                        destination: String::new(),
                        aircraft_type: String::new(),
                        tail: String::new(),
                        status: FlightStatus::open(),
                    },
                    passengers: Vec::new(),
                    movements: Vec::new(),
                })
            }
        };
        (key, entry)
    }
}

/// The process-wide store of flights, passenger lists, and movement logs.
///
/// All state is ephemeral; a restart discards it.
#[derive(Debug)]
pub struct RecordStore {
    pub(crate) inner: RwLock<StoreInner>,
    next_pax_id: AtomicU64,
}

/// Reject empty or whitespace-only required fields.
pub(crate) fn required(value: &str, field: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::missing_field(field));
    }
    Ok(())
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            next_pax_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn allocate_pax_id(&self) -> u64 {
        self.next_pax_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Idempotently create the flight for `(flight_no, flight_date)` with
    /// status `OPEN` and an empty passenger list, returning its key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when either component is empty.
    pub async fn ensure_flight(
        &self,
        flight_no: &str,
        flight_date: &str,
    ) -> Result<FlightKey, StoreError> {
        required(flight_no, "flight_no")?;
        required(flight_date, "flight_date")?;
        let mut inner = self.inner.write().await;
        let (key, _) = inner.ensure_entry(flight_no, flight_date);
        Ok(key)
    }

    /// Create or merge a flight record and return the full result.
    ///
    /// A provided field overwrites the stored value; an absent field
    /// preserves it. Creating a flight twice with identical fields is
    /// equivalent to creating it once.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when `flight_no` or `flight_date`
    /// is missing.
    pub async fn upsert_flight(&self, fields: FlightUpsert) -> Result<Flight, StoreError> {
        required(&fields.flight_no, "flight_no")?;
        required(&fields.flight_date, "flight_date")?;
        let mut inner = self.inner.write().await;
        let (key, entry) = inner.ensure_entry(&fields.flight_no, &fields.flight_date);
        if let Some(origin) = fields.origin {
            entry.flight.origin = origin;
        }
        if let Some(destination) = fields.destination {
            entry.flight.destination = destination;
        }
        if let Some(aircraft_type) = fields.aircraft_type {
            entry.flight.aircraft_type = aircraft_type;
        }
        if let Some(tail) = fields.tail {
            entry.flight.tail = tail;
        }
        if let Some(status) = fields.status {
            entry.flight.status = FlightStatus::new(&status);
        }
        info!(key = %key, status = %entry.flight.status, "flight upserted");
        Ok(entry.flight.clone())
    }

    /// Overwrite a flight's status unconditionally.
    ///
    /// No transition validation happens here; guards live in consumers
    /// (notably passenger check-in).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the flight is unknown.
    pub async fn set_flight_status(
        &self,
        flight_no: &str,
        flight_date: &str,
        status: &str,
    ) -> Result<Flight, StoreError> {
        let key = FlightKey::new(flight_no, flight_date);
        let mut inner = self.inner.write().await;
        let entry = inner
            .flights
            .get_mut(&key)
            .ok_or_else(|| StoreError::not_found("flight", &key))?;
        entry.flight.status = FlightStatus::new(status);
        info!(key = %key, status = %entry.flight.status, "flight status set");
        Ok(entry.flight.clone())
    }

    /// All flights, or only those on `date_filter`'s date. Order is
    /// unspecified; callers must treat the result as a set.
    pub async fn list_flights(&self, date_filter: Option<&str>) -> Vec<Flight> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|key| inner.flights.get(key))
            .map(|entry| &entry.flight)
            .filter(|flight| date_filter.is_none_or(|date| flight.flight_date == date))
            .cloned()
            .collect()
    }

    /// The ordered passenger list for a flight, ensuring the flight first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when either key component is
    /// empty.
    pub async fn passengers(
        &self,
        flight_no: &str,
        flight_date: &str,
    ) -> Result<Vec<Passenger>, StoreError> {
        required(flight_no, "flight_no")?;
        required(flight_date, "flight_date")?;
        let mut inner = self.inner.write().await;
        let (_, entry) = inner.ensure_entry(flight_no, flight_date);
        Ok(entry.passengers.clone())
    }

    /// Append one passenger to a flight's list.
    ///
    /// The sequence number is assigned once here as (current list length +
    /// 1), zero-padded to 3 digits, and is never renumbered.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the key components or the
    /// surname are missing.
    pub async fn create_passenger(
        &self,
        flight_no: &str,
        flight_date: &str,
        draft: PassengerDraft,
    ) -> Result<Passenger, StoreError> {
        required(flight_no, "flight_no")?;
        required(flight_date, "flight_date")?;
        required(&draft.surname, "surname")?;
        let id = self.allocate_pax_id();
        let mut inner = self.inner.write().await;
        let (key, entry) = inner.ensure_entry(flight_no, flight_date);
        let passenger = build_passenger(id, &entry.flight, entry.passengers.len(), draft);
        entry.passengers.push(passenger.clone());
        info!(key = %key, id, seq = %passenger.sequence_no, "passenger created");
        Ok(passenger)
    }

    /// The movement log for a flight, ensuring the flight first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when either key component is
    /// empty.
    pub async fn movements(
        &self,
        flight_no: &str,
        flight_date: &str,
    ) -> Result<Vec<MovementRecord>, StoreError> {
        required(flight_no, "flight_no")?;
        required(flight_date, "flight_date")?;
        let mut inner = self.inner.write().await;
        let (_, entry) = inner.ensure_entry(flight_no, flight_date);
        Ok(entry.movements.clone())
    }

    /// Append a movement record (timestamped now) to a flight's log.
    ///
    /// The log is append-only; records are never mutated after creation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when either key component is
    /// empty.
    pub async fn append_movement(
        &self,
        flight_no: &str,
        flight_date: &str,
        draft: MovementDraft,
    ) -> Result<MovementRecord, StoreError> {
        required(flight_no, "flight_no")?;
        required(flight_date, "flight_date")?;
        let record = MovementRecord {
            off: draft.off,
            atd: draft.atd,
            ata: draft.ata,
            remark: draft.remark,
            timestamp: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        let (key, entry) = inner.ensure_entry(flight_no, flight_date);
        entry.movements.push(record.clone());
        info!(key = %key, "movement appended");
        Ok(record)
    }

    /// Look up a passenger by id across all flights, returning the owning
    /// flight alongside the record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no flight's list contains the
    /// id.
    pub async fn passenger_by_id(&self, id: u64) -> Result<(Flight, Passenger), StoreError> {
        let inner = self.inner.read().await;
        inner
            .flights
            .values()
            .find_map(|entry| {
                entry
                    .passengers
                    .iter()
                    .find(|pax| pax.id == id)
                    .map(|pax| (entry.flight.clone(), pax.clone()))
            })
            .ok_or_else(|| StoreError::not_found("passenger", id))
    }
}

/// Build a passenger record from a draft at a given list position.
pub(crate) fn build_passenger(
    id: u64,
    flight: &Flight,
    list_len: usize,
    draft: PassengerDraft,
) -> Passenger {
    Passenger {
        id,
        flight_no: flight.flight_no.clone(),
        flight_date: flight.flight_date.clone(),
        surname: draft.surname,
        given: draft.given,
        pnr: draft.pnr,
        passport_no: draft.passport_no,
        seat: draft.seat,
        status: PaxStatus::Open,
        sequence_no: format!("{:03}", list_len + 1),
        bag_count: 0,
        boarded: false,
        comment: draft.comment,
        is_infant: draft.is_infant,
    }
}
