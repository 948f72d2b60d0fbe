//! Domain error taxonomy for store, lifecycle, and import operations.
//!
//! All errors are recoverable at the operation boundary: a failed operation
//! leaves the store untouched and never terminates the process. The web
//! shell maps each variant to an HTTP status classification.

use thiserror::Error;

/// Errors produced by [`RecordStore`](crate::store::RecordStore) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A required field is missing or empty (e.g. flight number, surname).
    #[error("{0}")]
    Validation(String),

    /// The addressed flight or passenger does not exist in the store.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of record that was addressed ("flight", "passenger").
        resource: &'static str,
        /// The id or key used in the lookup.
        id: String,
    },

    /// A status-guarded transition was blocked (e.g. check-in while the
    /// flight is in PD).
    #[error("{0}")]
    InvalidState(String),

    /// The import payload could not be decoded as text. The whole import
    /// is aborted; nothing is committed.
    #[error("import payload is not valid UTF-8")]
    ImportDecode,
}

impl StoreError {
    /// Build a [`StoreError::Validation`] for a missing required field.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }

    /// Build a [`StoreError::NotFound`] for a record kind and id.
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
