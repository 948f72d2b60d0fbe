//! Ground-movement log endpoints.
//!
//! - POST /api/flights/:flight_no/:flight_date/movements - Append
//! - GET  /api/flights/:flight_no/:flight_date/movements - List
//!
//! The log is append-only; each append publishes `movement:new` with the
//! timestamped record to the flight's room.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use dcs_core::{FlightKey, MovementDraft, MovementRecord, RoomEvent};
use serde::Serialize;

/// Response carrying one appended movement record.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Success marker.
    pub ok: bool,
    /// The appended record, with its server-side timestamp.
    pub movement: MovementRecord,
}

/// Response for a flight's movement log.
#[derive(Debug, Serialize)]
pub struct MovementListResponse {
    /// Success marker.
    pub ok: bool,
    /// The log in append order.
    pub movements: Vec<MovementRecord>,
}

/// Append a movement record to a flight's log.
///
/// # Errors
///
/// Returns 400 when a key component is empty.
pub async fn append_movement(
    State(state): State<AppState>,
    Path((flight_no, flight_date)): Path<(String, String)>,
    Json(draft): Json<MovementDraft>,
) -> Result<Json<MovementResponse>, AppError> {
    let movement = state
        .store
        .append_movement(&flight_no, &flight_date, draft)
        .await?;
    let key = FlightKey::new(&flight_no, &flight_date);
    state
        .hub
        .publish(
            &key,
            RoomEvent::MovementNew {
                movement: movement.clone(),
            },
        )
        .await;
    Ok(Json(MovementResponse { ok: true, movement }))
}

/// The movement log for a flight in append order.
///
/// # Errors
///
/// Returns 400 when a key component is empty.
pub async fn list_movements(
    State(state): State<AppState>,
    Path((flight_no, flight_date)): Path<(String, String)>,
) -> Result<Json<MovementListResponse>, AppError> {
    let movements = state.store.movements(&flight_no, &flight_date).await?;
    Ok(Json(MovementListResponse {
        ok: true,
        movements,
    }))
}
