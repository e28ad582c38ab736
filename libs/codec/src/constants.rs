//! # Teleinfo Wire Constants
//!
//! Byte-level constants of the historic Teleinfo output. These values are
//! fixed by the meter firmware and must not change.

/// Separator between two messages of a decoded frame
pub const MESSAGE_SEPARATOR: &[u8] = b"\n\n";

/// Separator between the key, value and checksum of one message
pub const FIELD_SEPARATOR: u8 = b' ';

/// Start of text: opens a meter transmission on the serial line
pub const STX: u8 = 0x02;

/// End of text: closes a meter transmission on the serial line
pub const ETX: u8 = 0x03;

/// Upper bound of one serial transmission between STX and ETX
///
/// Historic frames stay well under 1 KiB; anything longer is line noise.
pub const MAX_FRAME_LEN: usize = 2048;

/// Line feed opening each information group on the serial line
pub const GROUP_START: u8 = b'\n';

/// Carriage return closing each information group on the serial line
pub const GROUP_END: u8 = b'\r';

/// Mask applied to the byte sum of a message payload
pub const CHECKSUM_MASK: u32 = 0x3F;

/// Offset added to the masked sum to land in the printable range
pub const CHECKSUM_OFFSET: u32 = 0x20;

/// Key under which the read time is stored in every record
pub const DATETIME_KEY: &str = "datetime";

/// `chrono` format of the read time stored under [`DATETIME_KEY`]
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
