//! Error types for the otzar search layer.

use thiserror::Error;

/// Errors surfaced by index-backed operations.
///
/// An empty query is never an error: every search path maps zero tokens to a
/// defined empty result. The two variants below cover the remaining taxonomy:
/// the physical index cannot be reached at all, or a query (or stored-field
/// read) failed while executing against it.
#[derive(Debug, Error)]
pub enum OtzarError {
    /// The index is missing, corrupt, or locked.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    /// A search or stored-field read failed during execution.
    #[error("query execution failed: {0}")]
    QueryExecution(String),
}

impl OtzarError {
    /// Create an IndexUnavailable error.
    pub fn index_unavailable<S: Into<String>>(message: S) -> Self {
        OtzarError::IndexUnavailable(message.into())
    }

    /// Create a QueryExecution error.
    pub fn query<S: Into<String>>(message: S) -> Self {
        OtzarError::QueryExecution(message.into())
    }
}

// Failures raised once a handle exists are execution failures; open-time
// failures are mapped to IndexUnavailable explicitly at the open sites.
impl From<tantivy::TantivyError> for OtzarError {
    fn from(err: tantivy::TantivyError) -> Self {
        OtzarError::query(err.to_string())
    }
}

/// Result type alias for otzar operations.
pub type Result<T> = std::result::Result<T, OtzarError>;
