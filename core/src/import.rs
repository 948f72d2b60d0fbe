//! Manifest import: delimited passenger lines → passenger records.
//!
//! Converts raw delimited text into passenger records appended to a flight's
//! list, through the same creation path as interactive creation. The whole
//! batch runs under one write guard, so sequence numbers are gap-free within
//! the batch and cannot interleave with concurrent creates.
//!
//! # Line format
//!
//! One passenger per line, comma-separated, fields trimmed:
//!
//! ```text
//! SURNAME,GIVEN[,SEAT[,PNR]]
//! ```
//!
//! Lines with fewer than 2 fields are skipped, not fatal; only input that
//! cannot be decoded as text aborts the import (with nothing committed).

use crate::error::StoreError;
use crate::key::FlightKey;
use crate::store::{build_passenger, required, RecordStore};
use crate::types::PassengerDraft;
use tracing::{debug, info};

/// Split manifest text into passenger drafts.
///
/// Empty lines and lines with fewer than two comma-separated fields are
/// skipped. Surname and given name are upper-cased; seat and PNR are taken
/// verbatim (default empty).
#[must_use]
pub fn parse_manifest(text: &str) -> Vec<PassengerDraft> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 2 {
                debug!(line, "skipping short manifest line");
                return None;
            }
            Some(PassengerDraft {
                surname: fields[0].to_uppercase(),
                given: fields[1].to_uppercase(),
                seat: fields.get(2).copied().unwrap_or_default().to_string(),
                pnr: fields.get(3).copied().unwrap_or_default().to_string(),
                ..PassengerDraft::default()
            })
        })
        .collect()
}

impl RecordStore {
    /// Import a batch of delimited passenger lines into a flight's list,
    /// returning the number of records actually imported.
    ///
    /// The flight is ensured first. Line-level issues are skipped silently
    /// and only reflected in the returned tally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ImportDecode`] when `input` is not valid UTF-8
    /// (nothing is committed), or [`StoreError::Validation`] when a key
    /// component is missing.
    pub async fn import_passengers(
        &self,
        flight_no: &str,
        flight_date: &str,
        input: &[u8],
    ) -> Result<(FlightKey, usize), StoreError> {
        required(flight_no, "flight_no")?;
        required(flight_date, "flight_date")?;
        let text = std::str::from_utf8(input).map_err(|_| StoreError::ImportDecode)?;
        let drafts = parse_manifest(text);

        // Ids come from the shared counter, appends from one critical
        // section: the whole batch is a single atomicity unit.
        let ids: Vec<u64> = drafts.iter().map(|_| self.allocate_pax_id()).collect();
        let imported = drafts.len();
        let mut inner = self.inner.write().await;
        let (key, entry) = inner.ensure_entry(flight_no, flight_date);
        for (id, draft) in ids.into_iter().zip(drafts) {
            let passenger = build_passenger(id, &entry.flight, entry.passengers.len(), draft);
            entry.passengers.push(passenger);
        }
        info!(key = %key, imported, "manifest imported");
        Ok((key, imported))
    }
}
