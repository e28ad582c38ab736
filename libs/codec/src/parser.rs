//! # Frame Parser - Teleinfo Message Decoding
//!
//! ## Purpose
//!
//! Turns one decoded frame into a typed [`Record`]. A frame is a sequence
//! of `KEY VALUE CHECKSUM` messages separated by a double line feed. Every
//! message is checksum-verified before it is split, and a single corrupted
//! message rejects the whole frame: no partial record is ever returned.
//!
//! ## Splitting Rules
//!
//! - Messages are split on [`MESSAGE_SEPARATOR`]
//! - Each message is split on the first two spaces only; anything after
//!   the second space belongs to the checksum part
//! - An empty key is skipped silently
//! - Values of integer fields are parsed as base-10 numbers, leading
//!   zeros included; unknown keys are kept as text
//!
//! Whether the keys are known is not checked here, see
//! [`crate::validation::is_valid_record`].

use crate::catalog::{FieldCatalog, FieldType};
use crate::constants::{FIELD_SEPARATOR, MESSAGE_SEPARATOR};
use crate::error::{ProtocolError, ProtocolResult};
use crate::record::{FieldValue, Record};
use crate::validation::checksum::verify_message;
use tracing::{debug, trace, warn};

/// Result type for parsing operations
pub type ParseResult<T> = ProtocolResult<T>;

/// Iterate over the messages of a frame
pub fn split_messages(frame: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(frame);
    std::iter::from_fn(move || {
        let current = rest?;
        match find_separator(current) {
            Some(pos) => {
                rest = Some(&current[pos + MESSAGE_SEPARATOR.len()..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn find_separator(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(MESSAGE_SEPARATOR.len())
        .position(|window| window == MESSAGE_SEPARATOR)
}

/// Split a message into at most three space-separated parts
fn split_fields(message: &[u8]) -> (&[u8], Option<&[u8]>) {
    let mut parts = message.splitn(3, |&b| b == FIELD_SEPARATOR);
    let key = parts.next().unwrap_or_default();
    let value = parts.next();
    (key, value)
}

fn decode_utf8<'a>(bytes: &'a [u8], index: usize, field: &'static str) -> ParseResult<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidEncoding { index, field })
}

/// Coerce a raw value to the type the catalog declares for `key`
pub fn coerce_value(key: &str, value: &str) -> ParseResult<FieldValue> {
    match FieldCatalog::lookup(key) {
        Some(FieldType::Integer) => value
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| ProtocolError::invalid_integer(key, value)),
        Some(FieldType::Text) => Ok(FieldValue::Text(value.to_string())),
        None => {
            trace!(key, "field not in catalog, keeping value as text");
            Ok(FieldValue::Text(value.to_string()))
        }
    }
}

/// Parse one checksum-verified message
///
/// Returns `None` when the key is empty. A message without a value part
/// yields an empty value.
pub fn parse_message(message: &[u8], index: usize) -> ParseResult<Option<(String, FieldValue)>> {
    let (key, value) = split_fields(message);
    if key.is_empty() {
        trace!(index, "skipping message with empty key");
        return Ok(None);
    }

    let key = decode_utf8(key, index, "key")?;
    let value = decode_utf8(value.unwrap_or_default(), index, "value")?;
    let value = coerce_value(key, value)?;
    Ok(Some((key.to_string(), value)))
}

/// Parse a complete frame into a record
///
/// Fails on the first message whose checksum does not match.
pub fn parse_frame(frame: &[u8]) -> ParseResult<Record> {
    let mut record = Record::new();

    for (index, message) in split_messages(frame).enumerate() {
        if let Err(err) = verify_message(message, index) {
            warn!(index, error = %err, "rejecting frame");
            return Err(err);
        }

        if let Some((key, value)) = parse_message(message, index)? {
            record.insert(key, value);
        }
    }

    debug!(fields = record.len(), "frame decoded");
    Ok(record)
}
