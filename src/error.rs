//! Error types for segstore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SegstoreError
pub type Result<T> = std::result::Result<T, SegstoreError>;

/// Unified error type for segstore operations
#[derive(Debug, Error)]
pub enum SegstoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("{0} is required")]
    Validation(String),

    // -------------------------------------------------------------------------
    // Segment Errors
    // -------------------------------------------------------------------------
    #[error("Segment capacity exceeded: {needed} bytes needed, capacity is {capacity}")]
    CapacityExceeded { needed: u64, capacity: u64 },

    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Lifecycle / Compaction Errors
    // -------------------------------------------------------------------------
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
}
