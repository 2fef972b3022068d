//! Error types for the Cinder server.

use thiserror::Error;

/// Top-level error type for Cinder operations.
#[derive(Debug, Error)]
pub enum CinderError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be decoded or encoded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Cinder operations.
pub type CinderResult<T> = Result<T, CinderError>;
