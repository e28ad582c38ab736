//! # Teleinfo Codec
//!
//! ## Purpose
//!
//! This crate contains the "Rules" layer of the Teleinfo recorder:
//! - Checksum computation and verification of meter messages
//! - Frame splitting and message tokenization
//! - Field catalog and type coercion
//! - Record shape validation
//!
//! ## Architecture Role
//!
//! ```text
//! serial reader → [codec] → recorder pipeline
//!      ↑             ↓             ↓
//!  Raw Frames   Typed Records   Processors
//!  STX/ETX      Checksums       Handlers
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Serial port access or frame synchronisation (belongs in the recorder)
//! - Processing or persistence of decoded records
//! - Three-phase or professional meter fields

pub mod catalog;
pub mod constants;
pub mod error;
pub mod parser;
pub mod record;
pub mod validation;

// Re-export key types for convenience
pub use catalog::{FieldCatalog, FieldDescriptor, FieldType, FIELDS};
pub use constants::*;
pub use error::{ProtocolError, ProtocolResult};
pub use parser::{coerce_value, parse_frame, parse_message, split_messages};
pub use record::{FieldValue, Record};
pub use validation::{
    checksum, checksum_of_payload, is_valid_message, is_valid_record, seal_message,
    unknown_keys, verify_message,
};
