//! Teleinfo message checksum
//!
//! The checksum character is the low 6 bits of the byte sum of the message
//! payload, shifted into the printable range. The payload is the message
//! without its last byte, trimmed of surrounding whitespace.

use crate::constants::{CHECKSUM_MASK, CHECKSUM_OFFSET};
use crate::error::{ProtocolError, ProtocolResult};

/// Whitespace stripped around the payload before summing
fn is_trimmed(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x00 | 0x0B)
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| !is_trimmed(b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&b| !is_trimmed(b))
        .map_or(start, |pos| pos + 1);
    &bytes[start..end]
}

/// Checksum character of a payload that does not carry one yet
pub fn checksum_of_payload(payload: &[u8]) -> u8 {
    let sum = trim(payload)
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));
    // masked value is below 0x40, the result always fits a printable byte
    ((sum & CHECKSUM_MASK) + CHECKSUM_OFFSET) as u8
}

/// Checksum character expected for a complete message
///
/// The trailing checksum byte of `message` is excluded from the sum.
pub fn checksum(message: &[u8]) -> u8 {
    let payload = message.split_last().map_or(message, |(_, rest)| rest);
    checksum_of_payload(payload)
}

/// Check the trailing checksum byte of a message
pub fn is_valid_message(message: &[u8]) -> bool {
    match message.last() {
        Some(&received) => received == checksum(message),
        None => false,
    }
}

/// Verify a message, reporting its position in the frame on failure
pub fn verify_message(message: &[u8], index: usize) -> ProtocolResult<()> {
    if is_valid_message(message) {
        Ok(())
    } else {
        Err(ProtocolError::checksum_mismatch(index, checksum(message), message))
    }
}

/// Build a message from a key and value, appending its checksum
pub fn seal_message(key: &str, value: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(key.len() + value.len() + 3);
    message.extend_from_slice(key.as_bytes());
    message.push(b' ');
    message.extend_from_slice(value.as_bytes());
    let checksum = checksum_of_payload(&message);
    message.push(b' ');
    message.push(checksum);
    message
}
