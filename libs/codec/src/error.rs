//! Protocol-level errors for Teleinfo frame decoding
//!
//! Each variant carries enough context to tell which message of the frame
//! was rejected and why.

use thiserror::Error;

/// Frame decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Message checksum validation failed - the frame was altered in transit
    #[error("Checksum mismatch in message {index}: expected {expected:?}, received {received:?} (message: {message:?})")]
    ChecksumMismatch {
        index: usize,
        expected: char,
        received: Option<char>,
        message: String,
    },

    /// A field declared as integer carried a non-numeric value
    #[error("Invalid integer for field {key}: {value:?}")]
    InvalidInteger { key: String, value: String },

    /// Message bytes are not valid UTF-8
    #[error("Invalid encoding in message {index} ({field})")]
    InvalidEncoding { index: usize, field: &'static str },
}

impl ProtocolError {
    /// Create ChecksumMismatch error from the raw message bytes
    pub fn checksum_mismatch(index: usize, expected: u8, message: &[u8]) -> Self {
        Self::ChecksumMismatch {
            index,
            expected: char::from(expected),
            received: message.last().map(|&b| char::from(b)),
            message: String::from_utf8_lossy(message).into_owned(),
        }
    }

    /// Create InvalidInteger error
    pub fn invalid_integer(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidInteger {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Check if this error reports a corrupted message
    pub fn is_checksum_error(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. })
    }
}

/// Result type for protocol operations
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
