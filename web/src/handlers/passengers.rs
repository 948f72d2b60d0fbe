//! Passenger endpoints: creation, manifest import, lifecycle transitions.
//!
//! - GET  /api/flights/:flight_no/:flight_date/pax - Passenger list
//! - POST /api/flights/:flight_no/:flight_date/import - Manifest import
//! - POST /api/pax - Create one passenger
//! - POST /api/pax/:id/checkin | board | offload | bags - Lifecycle
//!
//! Creation publishes `pax:created` (once per batch for imports); every
//! lifecycle mutation publishes `pax:updated` carrying the entire updated
//! record to the owning flight's room.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use dcs_core::{FlightKey, Passenger, PassengerDraft, RoomEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create one passenger on a flight.
#[derive(Debug, Deserialize)]
pub struct CreatePaxRequest {
    /// Flight number.
    pub flight_no: String,
    /// Flight date.
    pub flight_date: String,
    /// The passenger fields.
    #[serde(flatten)]
    pub draft: PassengerDraft,
}

/// Response carrying one passenger record.
#[derive(Debug, Serialize)]
pub struct PaxResponse {
    /// Success marker.
    pub ok: bool,
    /// The full passenger record.
    pub passenger: Passenger,
}

/// Response for a passenger list.
#[derive(Debug, Serialize)]
pub struct PaxListResponse {
    /// Success marker.
    pub ok: bool,
    /// The ordered passenger list.
    pub passengers: Vec<Passenger>,
}

/// Response after a manifest import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Success marker.
    pub ok: bool,
    /// Number of records actually imported.
    pub imported: usize,
}

/// Request to add checked bags.
///
/// `count` is accepted as any JSON value and coerced; `total_weight` and
/// `manual_tag` are accepted and ignored by the store.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddBagsRequest {
    /// Requested bag count (coerced to a non-negative integer).
    pub count: Value,
    /// Total weight of the bags, informational only.
    pub total_weight: Option<f64>,
    /// Whether a manual tag was issued, informational only.
    pub manual_tag: Option<bool>,
}

/// Coerce a JSON value to a non-negative bag count; absent or invalid
/// values become 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped before the cast
fn coerce_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| if f > 0.0 { f as u64 } else { 0 }))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// The ordered passenger list for a flight (flight ensured first).
///
/// # Errors
///
/// Returns 400 when a key component is empty.
pub async fn list_passengers(
    State(state): State<AppState>,
    Path((flight_no, flight_date)): Path<(String, String)>,
) -> Result<Json<PaxListResponse>, AppError> {
    let passengers = state.store.passengers(&flight_no, &flight_date).await?;
    Ok(Json(PaxListResponse {
        ok: true,
        passengers,
    }))
}

/// Create one passenger; publishes `pax:created` with the new record.
///
/// # Errors
///
/// Returns 400 when the flight key or surname is missing.
pub async fn create_passenger(
    State(state): State<AppState>,
    Json(request): Json<CreatePaxRequest>,
) -> Result<Json<PaxResponse>, AppError> {
    let passenger = state
        .store
        .create_passenger(&request.flight_no, &request.flight_date, request.draft)
        .await?;
    let key = FlightKey::new(&passenger.flight_no, &passenger.flight_date);
    state
        .hub
        .publish(
            &key,
            RoomEvent::PaxCreated {
                passenger: Some(passenger.clone()),
                imported: 1,
            },
        )
        .await;
    Ok(Json(PaxResponse {
        ok: true,
        passenger,
    }))
}

/// Import a manifest of delimited passenger lines (raw text body).
///
/// Publishes `pax:created` once with the imported count, not once per
/// passenger.
///
/// # Errors
///
/// Returns 400 when the body is not decodable text (whole import aborted)
/// or a key component is empty.
pub async fn import_manifest(
    State(state): State<AppState>,
    Path((flight_no, flight_date)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    let (key, imported) = state
        .store
        .import_passengers(&flight_no, &flight_date, &body)
        .await?;
    state
        .hub
        .publish(
            &key,
            RoomEvent::PaxCreated {
                passenger: None,
                imported,
            },
        )
        .await;
    Ok(Json(ImportResponse { ok: true, imported }))
}

/// Check a passenger in.
///
/// # Errors
///
/// Returns 409 ("Flight in PD") while the owning flight is held, or 404 for
/// an unknown id.
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PaxResponse>, AppError> {
    let (key, passenger) = state.store.check_in(id).await?;
    publish_updated(&state, &key, passenger.clone()).await;
    Ok(Json(PaxResponse {
        ok: true,
        passenger,
    }))
}

/// Board a passenger (no prior-status guard).
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn board(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PaxResponse>, AppError> {
    let (key, passenger) = state.store.board(id).await?;
    publish_updated(&state, &key, passenger.clone()).await;
    Ok(Json(PaxResponse {
        ok: true,
        passenger,
    }))
}

/// Offload a passenger: back to OPEN, seat and boarded flag cleared.
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn offload(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PaxResponse>, AppError> {
    let (key, passenger) = state.store.offload(id).await?;
    publish_updated(&state, &key, passenger.clone()).await;
    Ok(Json(PaxResponse {
        ok: true,
        passenger,
    }))
}

/// Add checked bags to a passenger. A body-less request adds 0.
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn add_bags(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    request: Option<Json<AddBagsRequest>>,
) -> Result<Json<PaxResponse>, AppError> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let count = coerce_count(&request.count);
    let (key, passenger) = state.store.add_bags(id, count).await?;
    publish_updated(&state, &key, passenger.clone()).await;
    Ok(Json(PaxResponse {
        ok: true,
        passenger,
    }))
}

/// Publish the entire updated record to the owning flight's room.
async fn publish_updated(state: &AppState, key: &FlightKey, passenger: Passenger) {
    state
        .hub
        .publish(key, RoomEvent::PaxUpdated { passenger })
        .await;
}
