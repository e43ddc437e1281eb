//! Error types for the HNSW index

use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, HnswError>;

/// Errors reported at the index's call boundary.
///
/// Internal graph corruption is not represented here: those faults panic
/// inside [`GraphStore`](crate::hnsw::GraphStore).
#[derive(Error, Debug)]
pub enum HnswError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },
}
