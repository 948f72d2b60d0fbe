//! Passenger document endpoints: boarding passes and bag tags.
//!
//! - GET /api/pax/:id/boarding-pass
//! - GET /api/pax/:id/bag-tag
//!
//! Rendering goes through the [`DocumentRenderer`](crate::docs::DocumentRenderer)
//! seam; the handlers only locate the passenger by id and serve the opaque
//! payload with its content type.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

/// Render and serve a passenger's boarding pass.
///
/// # Errors
///
/// Returns 404 for an unknown passenger id.
pub async fn boarding_pass(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let (flight, passenger) = state.store.passenger_by_id(id).await?;
    let doc = state.documents.boarding_pass(&flight, &passenger);
    Ok(([(header::CONTENT_TYPE, doc.content_type)], doc.bytes).into_response())
}

/// Render and serve a passenger's bag-tag label.
///
/// # Errors
///
/// Returns 404 for an unknown passenger id.
pub async fn bag_tag(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let (flight, passenger) = state.store.passenger_by_id(id).await?;
    let doc = state.documents.bag_tag(&flight, &passenger);
    Ok(([(header::CONTENT_TYPE, doc.content_type)], doc.bytes).into_response())
}
