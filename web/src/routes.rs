//! Router configuration for the DCS server.
//!
//! Builds the complete Axum router with all endpoints.

use crate::handlers::{documents, flights, health, movements, passengers, websocket};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health check
/// - Flight management and listing
/// - Passenger creation, manifest import, and lifecycle transitions
/// - Movement log
/// - Passenger documents
/// - The realtime WebSocket endpoint
///
/// # Arguments
///
/// - `state`: Application state to share with handlers
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Flight management
        .route(
            "/flights",
            post(flights::upsert_flight).get(flights::list_flights),
        )
        .route("/flights/status", post(flights::set_status))
        // Per-flight collections
        .route(
            "/flights/:flight_no/:flight_date/pax",
            get(passengers::list_passengers),
        )
        .route(
            "/flights/:flight_no/:flight_date/import",
            post(passengers::import_manifest),
        )
        .route(
            "/flights/:flight_no/:flight_date/movements",
            post(movements::append_movement).get(movements::list_movements),
        )
        // Passenger creation and lifecycle
        .route("/pax", post(passengers::create_passenger))
        .route("/pax/:id/checkin", post(passengers::check_in))
        .route("/pax/:id/board", post(passengers::board))
        .route("/pax/:id/offload", post(passengers::offload))
        .route("/pax/:id/bags", post(passengers::add_bags))
        // Passenger documents
        .route("/pax/:id/boarding-pass", get(documents::boarding_pass))
        .route("/pax/:id/bag-tag", get(documents::bag_tag));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(websocket::ws_handler))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
