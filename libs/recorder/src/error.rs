//! Recorder errors
//!
//! Every failure of a write cycle is reported to the caller of
//! [`crate::Recorder::write`]; nothing is retried or swallowed inside the
//! pipeline.

use std::io;
use teleinfo_codec::ProtocolError;
use thiserror::Error;

/// Failure of a recorder operation
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The frame reader failed
    #[error("Frame read failed: {0}")]
    Read(#[from] io::Error),

    /// The frame could not be decoded, e.g. a checksum mismatch
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The decoded record carries fields outside the catalog
    #[error("Record is not a valid record, unknown fields: {unknown_keys:?}")]
    Shape { unknown_keys: Vec<String> },

    #[error("Tried to pop from an empty handler stack")]
    EmptyHandlerStack,

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Processor for {key} failed: {source}")]
    Processor {
        key: String,
        #[source]
        source: ProcessorError,
    },

    #[error("Handler {handler} failed: {source}")]
    Handler {
        handler: String,
        #[source]
        source: HandlerError,
    },
}

impl RecorderError {
    /// Create an invalid configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if the frame was rejected because a message was corrupted
    pub fn is_checksum_error(&self) -> bool {
        matches!(self, Self::Protocol(err) if err.is_checksum_error())
    }

    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }
}

/// Failure of a processor callback
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Field {0} is missing from the record")]
    MissingField(String),

    #[error("Field {key} is {found}, expected {expected}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Other(String),
}

/// Failure of a record handler
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
