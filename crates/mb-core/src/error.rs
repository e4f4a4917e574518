//! # AppError
//!
//! Centralized error handling for the message board.
//! Maps storage and request failures to actionable error types.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all mb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Vote target absent
    #[error("message not found with ID {0}")]
    NotFound(String),

    /// Request refused before touching storage (e.g., blank post, bad vote)
    #[error("rejected: {0}")]
    ValidationRejected(String),

    /// The backing store exists but could not be read or parsed.
    #[error("storage at {path} is unreadable: {source}")]
    StorageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be written.
    #[error("storage at {path} is unwritable: {source}")]
    StorageUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Anything else (template rendering, OS randomness)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for message board logic.
pub type Result<T> = std::result::Result<T, AppError>;
