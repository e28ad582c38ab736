//! # Teleinfo Recorder
//!
//! ## Purpose
//!
//! Record pipeline on top of the Teleinfo codec: pulls raw frames from a
//! reader, decodes and validates them, stamps the read time, derives extra
//! fields and hands the finished record to a stack of handlers.
//!
//! ## Architecture Role
//!
//! ```text
//! FrameReader → codec::parse_frame → shape check → datetime
//!                                                     ↓
//!                         HandlerStack ← ProcessorChain
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use teleinfo_recorder::{Recorder, SerialFrameReader, TracingHandler};
//!
//! let reader = SerialFrameReader::open("/dev/ttyAMA0")?;
//! let mut recorder = Recorder::new(reader);
//! recorder.set_name("main")?;
//! recorder.push_handler(Box::new(TracingHandler::new("main")));
//! let record = recorder.write()?;
//! # let _ = record;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod clock;
pub mod error;
pub mod handler;
pub mod processor;
pub mod reader;
pub mod recorder;
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{HandlerError, ProcessorError, RecorderError};
pub use handler::{Handler, HandlerStack, JsonLinesHandler, TracingHandler};
pub use processor::{CostProcessor, Processor, ProcessorChain, ProcessorMode};
pub use reader::{FrameReader, SerialFrameReader};
pub use recorder::{CycleStage, Recorder};

// Decoded records are part of the public API of every handler and processor
pub use teleinfo_codec::{FieldValue, Record};
