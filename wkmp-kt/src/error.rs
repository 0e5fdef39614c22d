//! Error types for wkmp-kt
//!
//! Every variant except a malformed request line becomes exactly one
//! error response on the protocol stream.

use thiserror::Error;

/// Per-request failure of a key read or write
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagError {
    /// Request path does not exist on disk
    #[error("File not found")]
    FileNotFound,

    /// Extension is not one of the known container formats
    ///
    /// Carries the extension with its leading dot (empty if none).
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Tag library failed to open, parse or save the container
    #[error("{0}")]
    Container(String),

    /// Request fields were present but had the wrong JSON type
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Anything else caught at the worker boundary (including panics)
    #[error("{0}")]
    Unexpected(String),
}

impl From<lofty::error::LoftyError> for TagError {
    fn from(err: lofty::error::LoftyError) -> Self {
        TagError::Container(err.to_string())
    }
}

impl From<id3::Error> for TagError {
    fn from(err: id3::Error) -> Self {
        TagError::Container(err.to_string())
    }
}

impl From<std::io::Error> for TagError {
    fn from(err: std::io::Error) -> Self {
        TagError::Container(err.to_string())
    }
}

/// Result type for tag operations
pub type TagResult<T> = Result<T, TagError>;
