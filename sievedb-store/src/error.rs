//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Backends construct these; the adapter never translates or retries them,
/// so whatever a backend reports surfaces verbatim to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection-level failure (open, worker task, I/O).
    #[error("connection error: {0}")]
    Connection(String),

    /// Query preparation or execution failure.
    #[error("query error: {0}")]
    Query(String),

    /// The store rejected the data (constraint violation).
    #[error("validation error: {0}")]
    Validation(String),

    /// The backend does not support the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
