//! Error types for cravelog-core

use thiserror::Error;

/// Main error type for the cravelog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Input validation failure (caller's fault, not retried)
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage collaborator failure (possibly transient)
    #[error("persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// Read-side failure during stat computation; treated as
    /// "stats unavailable" by the presentation layer
    #[error("aggregation error: {0}")]
    Aggregation(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Craving not found
    #[error("craving not found: {0}")]
    CravingNotFound(String),
}

/// Validation failures surfaced synchronously to the caller that
/// constructed the invalid value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Craving text was empty or whitespace-only after trimming
    #[error("craving text is empty")]
    EmptyText,
}

/// Result type alias for cravelog-core
pub type Result<T> = std::result::Result<T, Error>;
