//! Application state for the DCS HTTP server.
//!
//! Contains the shared resources handlers need: the record store, the room
//! hub, and the document renderer. The store is constructed once at process
//! start and injected here, never reached through globals, so tests get
//! isolation from fresh instances.

use crate::docs::{DocumentRenderer, TextRenderer};
use crate::hub::RoomHub;
use dcs_core::RecordStore;
use std::sync::Arc;

/// Application state shared across all HTTP and WebSocket handlers.
///
/// Cloned (cheaply via `Arc`) for each request.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide record store.
    pub store: Arc<RecordStore>,
    /// Room membership and realtime fan-out.
    pub hub: RoomHub,
    /// Boarding-pass and bag-tag renderer.
    pub documents: Arc<dyn DocumentRenderer>,
}

impl AppState {
    /// Create application state around an existing store.
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            hub: RoomHub::new(),
            documents: Arc::new(TextRenderer),
        }
    }

    /// Swap in a different document renderer.
    #[must_use]
    pub fn with_documents(mut self, documents: Arc<dyn DocumentRenderer>) -> Self {
        self.documents = documents;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(RecordStore::new()))
    }
}
