//! # Recorder - Write Cycle Orchestration
//!
//! One [`Recorder::write`] call runs one complete cycle:
//!
//! ```text
//! Idle → FrameRead → Parsed → Validated → Timestamped → Processed → Dispatched → Idle
//!           ↓           ↓          ↓                          ↓            ↓
//!        io error   checksum    unknown                  processor     handler
//!                   mismatch    field                    failure       failure
//! ```
//!
//! Any failure ends the cycle early and is returned to the caller; no
//! handler sees a record from a failed read or validation. The recorder
//! keeps its registrations and can run the next cycle right away.
//!
//! Cycles are synchronous and must not overlap: callers drive `write` from
//! a single thread, typically once per polling tick.

use crate::clock::{Clock, SystemClock};
use crate::error::{ProcessorError, RecorderError};
use crate::handler::{Handler, HandlerStack};
use crate::processor::{Processor, ProcessorChain, ProcessorMode};
use crate::reader::FrameReader;
use std::fmt;
use teleinfo_codec::{
    is_valid_message, is_valid_record, parse_frame, unknown_keys, FieldValue, Record,
    DATETIME_FORMAT, DATETIME_KEY,
};
use tracing::{debug, info_span, warn};

/// Stage reached by a write cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Idle,
    FrameRead,
    Parsed,
    Validated,
    Timestamped,
    Processed,
    Dispatched,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FrameRead => "frame_read",
            Self::Parsed => "parsed",
            Self::Validated => "validated",
            Self::Timestamped => "timestamped",
            Self::Processed => "processed",
            Self::Dispatched => "dispatched",
        };
        f.write_str(name)
    }
}

/// Reads, validates, enriches and dispatches meter records
pub struct Recorder<R> {
    name: String,
    reader: R,
    processors: ProcessorChain,
    handlers: HandlerStack,
    clock: Box<dyn Clock>,
    last_stage: CycleStage,
}

impl<R: FrameReader> Recorder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            name: String::new(),
            reader,
            processors: ProcessorChain::default(),
            handlers: HandlerStack::new(),
            clock: Box::new(SystemClock),
            last_stage: CycleStage::Idle,
        }
    }

    /// Replace the clock used for the `datetime` field
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_processor_mode(mut self, mode: ProcessorMode) -> Self {
        self.processors.set_mode(mode);
        self
    }

    /// Set the name of the counter
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), RecorderError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecorderError::configuration(
                "The counter name must not be empty",
            ));
        }
        self.name = name;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor_mode(&self) -> ProcessorMode {
        self.processors.mode()
    }

    /// Register a processor, returning the number of queued processors
    pub fn push_processor(
        &mut self,
        key: impl Into<String>,
        processor: impl Processor + 'static,
    ) -> Result<usize, RecorderError> {
        self.processors.push(key, processor)
    }

    /// Register a closure as processor
    pub fn push_processor_fn<F>(
        &mut self,
        key: impl Into<String>,
        callback: F,
    ) -> Result<usize, RecorderError>
    where
        F: FnMut(&Record) -> Result<FieldValue, ProcessorError> + Send + 'static,
    {
        self.processors.push_fn(key, callback)
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Push a handler on to the stack, returning the new stack size
    pub fn push_handler(&mut self, handler: Box<dyn Handler>) -> usize {
        self.handlers.push(handler)
    }

    /// Pop the most recently pushed handler
    pub fn pop_handler(&mut self) -> Result<Box<dyn Handler>, RecorderError> {
        self.handlers.pop()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Handler names in dispatch order
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.names()
    }

    /// Check the checksum of a single message
    pub fn is_valid_message(&self, message: &[u8]) -> bool {
        is_valid_message(message)
    }

    /// Check that every field of `record` is a known field
    pub fn is_valid_record(&self, record: &Record) -> bool {
        is_valid_record(record)
    }

    /// Stage reached by the most recent write cycle
    pub fn last_stage(&self) -> CycleStage {
        self.last_stage
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Read one frame and decode it
    ///
    /// The record is neither shape-validated nor timestamped.
    pub fn read_record(&mut self) -> Result<Record, RecorderError> {
        let frame = self.reader.read_frame()?;
        self.last_stage = CycleStage::FrameRead;

        let record = parse_frame(&frame)?;
        self.last_stage = CycleStage::Parsed;
        Ok(record)
    }

    /// Run one complete write cycle
    ///
    /// Returns the record handed to the handlers.
    pub fn write(&mut self) -> Result<Record, RecorderError> {
        let span = info_span!("write", counter = %self.name);
        let _enter = span.enter();

        self.last_stage = CycleStage::Idle;
        let mut record = self.read_record()?;

        let unknown = unknown_keys(&record);
        if !unknown.is_empty() {
            let unknown_keys: Vec<String> = unknown.into_iter().map(str::to_string).collect();
            warn!(?unknown_keys, "record rejected");
            return Err(RecorderError::Shape { unknown_keys });
        }
        self.last_stage = CycleStage::Validated;

        let now = self.clock.now().format(DATETIME_FORMAT).to_string();
        record.insert(DATETIME_KEY, now);
        self.last_stage = CycleStage::Timestamped;

        self.processors.run_all(&mut record)?;
        self.last_stage = CycleStage::Processed;

        self.handlers.handle(&record)?;
        self.last_stage = CycleStage::Dispatched;

        debug!(
            fields = record.len(),
            handlers = self.handlers.len(),
            "record dispatched"
        );
        Ok(record)
    }
}

impl<R: fmt::Debug> fmt::Debug for Recorder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("name", &self.name)
            .field("reader", &self.reader)
            .field("processors", &self.processors)
            .field("handlers", &self.handlers)
            .field("last_stage", &self.last_stage)
            .finish()
    }
}
