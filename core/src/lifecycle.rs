//! Passenger lifecycle transitions: check-in, board, offload, bags.
//!
//! Operations address a passenger by id across all flights; the id alone is
//! the public lookup key. Each successful mutation returns the owning
//! flight's key together with the entire updated record, so the shell can
//! publish the full passenger (never a diff) to that flight's room.
//!
//! Guards live here, not in the store: `set_flight_status` overwrites
//! unconditionally, while `check_in` refuses when the owning flight is in
//! PD. `board` deliberately has no precondition on the prior passenger
//! status; an unchecked passenger can board.

use crate::error::StoreError;
use crate::key::FlightKey;
use crate::store::RecordStore;
use crate::types::{Passenger, PaxStatus};
use tracing::info;

impl RecordStore {
    /// Check a passenger in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidState`] ("Flight in PD") when the owning
    /// flight's status is PD, leaving the passenger untouched, or
    /// [`StoreError::NotFound`] for an unknown id.
    pub async fn check_in(&self, id: u64) -> Result<(FlightKey, Passenger), StoreError> {
        self.mutate_passenger(id, |flight_status_pd, pax| {
            if flight_status_pd {
                return Err(StoreError::InvalidState("Flight in PD".to_string()));
            }
            pax.status = PaxStatus::Checked;
            Ok(())
        })
        .await
    }

    /// Board a passenger.
    ///
    /// No guard on the prior status: boarding an unchecked passenger is
    /// permitted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub async fn board(&self, id: u64) -> Result<(FlightKey, Passenger), StoreError> {
        self.mutate_passenger(id, |_, pax| {
            pax.status = PaxStatus::Boarded;
            pax.boarded = true;
            Ok(())
        })
        .await
    }

    /// Offload a passenger: back to OPEN, seat and boarded flag cleared,
    /// regardless of prior state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub async fn offload(&self, id: u64) -> Result<(FlightKey, Passenger), StoreError> {
        self.mutate_passenger(id, |_, pax| {
            pax.status = PaxStatus::Open;
            pax.boarded = false;
            pax.seat = String::new();
            Ok(())
        })
        .await
    }

    /// Add checked bags to a passenger's count, saturating at `u32::MAX`.
    ///
    /// Callers coerce the requested count to a non-negative number before
    /// reaching here; absent or invalid counts add 0.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub async fn add_bags(&self, id: u64, count: u32) -> Result<(FlightKey, Passenger), StoreError> {
        self.mutate_passenger(id, |_, pax| {
            pax.bag_count = pax.bag_count.saturating_add(count);
            Ok(())
        })
        .await
    }

    /// Locate a passenger by id and apply `apply` under the store's single
    /// write guard. `apply` sees whether the owning flight is in PD and the
    /// mutable record; an `Err` leaves the record untouched.
    async fn mutate_passenger<F>(
        &self,
        id: u64,
        apply: F,
    ) -> Result<(FlightKey, Passenger), StoreError>
    where
        F: FnOnce(bool, &mut Passenger) -> Result<(), StoreError>,
    {
        let mut inner = self.inner.write().await;
        for (key, entry) in &mut inner.flights {
            let flight_pd = entry.flight.status.is_pd();
            if let Some(pax) = entry.passengers.iter_mut().find(|pax| pax.id == id) {
                apply(flight_pd, pax)?;
                info!(key = %key, id, status = ?pax.status, "passenger updated");
                return Ok((key.clone(), pax.clone()));
            }
        }
        Err(StoreError::not_found("passenger", id))
    }
}
