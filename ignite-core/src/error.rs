//! Error types for Ignite thin-client operations.

use std::io;
use thiserror::Error;

/// The main error type for Ignite thin-client operations.
#[derive(Debug, Error)]
pub enum IgniteError {
    /// Connection-related errors (network failures, disconnections).
    #[error("connection error: {0}")]
    Connection(String),

    /// A value does not fit the declared wire type, or overflows every type.
    #[error("encode error: {0}")]
    Encode(String),

    /// A buffer could not be decoded (truncated data, unknown type code,
    /// trailing bytes).
    #[error("decode error: {0}")]
    Decode(String),

    /// The peer violated the protocol (query id mismatch, rejected handshake).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered with a nonzero status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// Status code reported by the server.
        status: i32,
        /// Error text supplied by the server.
        message: String,
    },

    /// A cache property code has no entry in the property table.
    #[error("unknown cache property code: {0}")]
    UnknownProperty(i16),

    /// Configuration errors (invalid settings, missing mandatory properties).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Operation timeout errors.
    #[error("timeout error: {0}")]
    Timeout(String),

    /// I/O errors from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl IgniteError {
    /// Returns the server status code if this error came from a failed response.
    pub fn status(&self) -> Option<i32> {
        match self {
            IgniteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Ignite operations.
pub type Result<T> = std::result::Result<T, IgniteError>;
