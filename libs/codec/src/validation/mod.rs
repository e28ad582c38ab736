//! # Teleinfo Validation
//!
//! Two independent checks guard every decoded frame:
//!
//! ```text
//! Raw Message → checksum → Parser → Record → record shape → Valid Record
//!      ↓            ↓                            ↓
//!  "BASE 001234 E"  corrupted line       unknown field code
//! ```
//!
//! - **checksum**: per message, detects bit errors on the serial line
//! - **record**: per record, detects fields outside the catalog

pub mod checksum;
pub mod record;

pub use checksum::{checksum, checksum_of_payload, is_valid_message, seal_message, verify_message};
pub use record::{is_valid_record, unknown_keys};
