//! Axum web and WebSocket shell for the DCS check-in core.
//!
//! This crate is the imperative shell around [`dcs_core`]: it parses HTTP
//! requests, drives the record store, and fans out every successful
//! mutation to the WebSocket room watching the affected flight.
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extract** path/query/JSON fields
//! 3. **Mutate** through the shared [`RecordStore`](dcs_core::RecordStore)
//! 4. **Publish** the resulting full record to the flight's room via
//!    [`RoomHub`](hub::RoomHub) (fire-and-forget)
//! 5. **Return** `{"ok": true, ...}` or a classified error body
//!
//! # Realtime Protocol
//!
//! Clients connect to `/ws` and join one or more flight rooms:
//!
//! ```json
//! { "type": "join", "flight_no": "AI101", "flight_date": "2024-05-01" }
//! ```
//!
//! Mutations on a joined flight arrive as:
//!
//! ```json
//! { "type": "event", "key": "AI1012024-05-01",
//!   "event": { "name": "pax:updated", "passenger": { ... } } }
//! ```

pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod hub;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use hub::RoomHub;
pub use routes::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
