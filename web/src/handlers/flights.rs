//! Flight management endpoints.
//!
//! - POST /api/flights - Create or merge a flight record
//! - GET  /api/flights - List flights, optionally filtered by date
//! - POST /api/flights/status - Overwrite a flight's status
//!
//! Every successful mutation publishes `flights:changed` with the full
//! resulting flight to that flight's room.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use dcs_core::{Flight, FlightKey, FlightUpsert, RoomEvent};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response carrying one flight record.
#[derive(Debug, Serialize)]
pub struct FlightResponse {
    /// Success marker.
    pub ok: bool,
    /// The full resulting flight.
    pub flight: Flight,
}

/// Query parameters for listing flights.
#[derive(Debug, Deserialize)]
pub struct ListFlightsQuery {
    /// Only flights on this date.
    pub date: Option<String>,
}

/// Response for listing flights. Order is unspecified; treat as a set.
#[derive(Debug, Serialize)]
pub struct ListFlightsResponse {
    /// Success marker.
    pub ok: bool,
    /// The flights.
    pub flights: Vec<Flight>,
}

/// Request to overwrite a flight's status.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// Flight number.
    pub flight_no: String,
    /// Flight date.
    pub flight_date: String,
    /// The new status token.
    pub status: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create or merge a flight record.
///
/// Provided fields overwrite stored values; absent fields preserve them.
/// New flights start with status `OPEN`.
///
/// # Errors
///
/// Returns 400 when `flight_no` or `flight_date` is missing.
pub async fn upsert_flight(
    State(state): State<AppState>,
    Json(fields): Json<FlightUpsert>,
) -> Result<Json<FlightResponse>, AppError> {
    let flight = state.store.upsert_flight(fields).await?;
    let key = FlightKey::new(&flight.flight_no, &flight.flight_date);
    state
        .hub
        .publish(
            &key,
            RoomEvent::FlightsChanged {
                flight: flight.clone(),
            },
        )
        .await;
    Ok(Json(FlightResponse { ok: true, flight }))
}

/// List flights, optionally filtered to one date.
pub async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<ListFlightsQuery>,
) -> Json<ListFlightsResponse> {
    let flights = state.store.list_flights(query.date.as_deref()).await;
    Json(ListFlightsResponse { ok: true, flights })
}

/// Overwrite a flight's status unconditionally.
///
/// Transition guards live on the passenger side (check-in refuses while the
/// flight is in PD), not here.
///
/// # Errors
///
/// Returns 404 for an unknown flight.
pub async fn set_status(
    State(state): State<AppState>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<FlightResponse>, AppError> {
    let flight = state
        .store
        .set_flight_status(&request.flight_no, &request.flight_date, &request.status)
        .await?;
    let key = FlightKey::new(&flight.flight_no, &flight.flight_date);
    state
        .hub
        .publish(
            &key,
            RoomEvent::FlightsChanged {
                flight: flight.clone(),
            },
        )
        .await;
    Ok(Json(FlightResponse { ok: true, flight }))
}
