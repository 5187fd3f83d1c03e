//! Error types for comet-core

use thiserror::Error;

/// Result type alias for comet-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing error
    #[error("JSON parsing failed: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid event structure
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Invalid comment root reference
    #[error("Invalid root reference: {0}")]
    InvalidRoot(String),
}
