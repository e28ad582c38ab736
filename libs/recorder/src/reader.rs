//! # Frame Readers
//!
//! The recorder pulls one raw frame per write cycle from a [`FrameReader`].
//! A raw frame is a sequence of `KEY VALUE CHECKSUM` messages separated by
//! a double line feed.
//!
//! [`SerialFrameReader`] produces such frames from the meter's serial
//! output, where one transmission looks like:
//!
//! ```text
//! STX LF ADCO 020830087360 < CR LF OPTARIF BASE 0 CR ... ETX
//! ```
//!
//! The serial line itself (1200 baud, 7E1) must be configured beforehand,
//! e.g. with `stty`.

use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;
use teleinfo_codec::{ETX, GROUP_END, GROUP_START, MAX_FRAME_LEN, MESSAGE_SEPARATOR, STX};
use tracing::{debug, trace};

/// End of transmission: the meter interrupted the current frame
const EOT: u8 = 0x04;

/// Source of raw frames
pub trait FrameReader {
    /// Read one complete frame, blocking until it is available
    fn read_frame(&mut self) -> io::Result<Vec<u8>>;

    /// Source description used in logs
    fn name(&self) -> &str;
}

impl<T: FrameReader + ?Sized> FrameReader for Box<T> {
    fn read_frame(&mut self) -> io::Result<Vec<u8>> {
        (**self).read_frame()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Reads STX/ETX delimited transmissions from a byte stream
#[derive(Debug)]
pub struct SerialFrameReader<R> {
    inner: BufReader<R>,
    name: String,
    mask_parity: bool,
}

impl SerialFrameReader<File> {
    /// Open a serial device or a capture file
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!(device = %path.as_ref().display(), "serial reader opened");
        Ok(Self::new(file).with_name(path.as_ref().display().to_string()))
    }
}

impl<R: Read> SerialFrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            name: "serial".to_string(),
            mask_parity: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Clear the 8th bit of every byte (default: on)
    ///
    /// A 7E1 line read as 8 data bits delivers the parity in the high bit.
    pub fn with_parity_mask(mut self, mask_parity: bool) -> Self {
        self.mask_parity = mask_parity;
        self
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.inner.read_exact(&mut byte)?;
        Ok(if self.mask_parity { byte[0] & 0x7F } else { byte[0] })
    }

    /// Read the bytes between the next STX and its ETX
    fn read_transmission(&mut self) -> io::Result<Vec<u8>> {
        let mut skipped = 0usize;
        while self.read_byte()? != STX {
            skipped += 1;
        }
        if skipped > 0 {
            trace!(skipped, "bytes before start of frame dropped");
        }

        let mut raw = Vec::with_capacity(512);
        loop {
            match self.read_byte()? {
                ETX => return Ok(raw),
                EOT => {
                    return Err(io::Error::new(
                        ErrorKind::Interrupted,
                        "meter interrupted the transmission",
                    ))
                }
                STX => {
                    return Err(io::Error::new(
                        ErrorKind::InvalidData,
                        "start of frame before end of previous frame",
                    ))
                }
                _ if raw.len() == MAX_FRAME_LEN => {
                    return Err(io::Error::new(
                        ErrorKind::InvalidData,
                        format!("no end of frame within {MAX_FRAME_LEN} bytes"),
                    ))
                }
                byte => raw.push(byte),
            }
        }
    }
}

/// Turn `LF group CR` information groups into separator-joined messages
pub fn groups_to_messages(raw: &[u8]) -> Vec<u8> {
    let groups: Vec<&[u8]> = raw
        .split(|&b| b == GROUP_END)
        .map(|group| group.strip_prefix(&[GROUP_START]).unwrap_or(group))
        .filter(|group| !group.is_empty())
        .collect();
    groups.join(MESSAGE_SEPARATOR)
}

impl<R: Read> FrameReader for SerialFrameReader<R> {
    fn read_frame(&mut self) -> io::Result<Vec<u8>> {
        let raw = self.read_transmission()?;
        let frame = groups_to_messages(&raw);
        debug!(source = %self.name, bytes = frame.len(), "frame read");
        Ok(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
