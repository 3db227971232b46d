//! Error types for loadgen-types crate.

use thiserror::Error;

/// Errors that can occur while building or encoding outcomes.
#[derive(Error, Debug)]
pub enum LoadgenTypesError {
    #[error("Invalid record location: partition={partition}, offset={offset}")]
    InvalidLocation { partition: i32, offset: i64 },

    #[error("JSON encoding error: {0}")]
    JsonEncode(#[from] serde_json::Error),
}

/// Result type alias for loadgen-types operations.
pub type Result<T> = std::result::Result<T, LoadgenTypesError>;
