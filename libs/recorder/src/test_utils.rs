use crate::error::HandlerError;
use crate::handler::Handler;
use crate::reader::FrameReader;
use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::sync::{Arc, Mutex};
use teleinfo_codec::Record;

/// Shared log of handler names, in invocation order
pub type InvocationLog = Arc<Mutex<Vec<String>>>;

/// A handler that collects records for testing
///
/// Clones share the collected records, so a clone can be kept for
/// assertions after the handler is pushed on a recorder.
#[derive(Debug, Clone)]
pub struct CollectorHandler {
    name: String,
    records: Arc<Mutex<Vec<Record>>>,
    log: Option<InvocationLog>,
}

impl CollectorHandler {
    pub fn new() -> Self {
        Self::with_name("collector")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Arc::new(Mutex::new(Vec::new())),
            log: None,
        }
    }

    /// Create a collector that also appends its name to `log` when invoked
    pub fn with_log(name: impl Into<String>, log: InvocationLog) -> Self {
        let mut handler = Self::with_name(name);
        handler.log = Some(log);
        handler
    }

    pub fn shared_log() -> InvocationLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Get all received records
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Record> {
        self.records.lock().unwrap().last().cloned()
    }
}

impl Default for CollectorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for CollectorHandler {
    fn handle(&mut self, record: &Record) -> Result<(), HandlerError> {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.clone());
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A handler that always fails
#[derive(Debug, Clone)]
pub struct FailingHandler {
    name: String,
}

impl FailingHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Handler for FailingHandler {
    fn handle(&mut self, _record: &Record) -> Result<(), HandlerError> {
        Err(HandlerError::Other(format!("{} always fails", self.name)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A reader replaying a fixed script of frames and errors
#[derive(Debug, Default)]
pub struct ScriptedReader {
    script: VecDeque<Result<Vec<u8>, ErrorKind>>,
    reads: usize,
}

impl ScriptedReader {
    pub fn new<I, F>(frames: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Vec<u8>>,
    {
        Self {
            script: frames.into_iter().map(|frame| Ok(frame.into())).collect(),
            reads: 0,
        }
    }

    pub fn push_frame(&mut self, frame: impl Into<Vec<u8>>) {
        self.script.push_back(Ok(frame.into()));
    }

    pub fn push_error(&mut self, kind: ErrorKind) {
        self.script.push_back(Err(kind));
    }

    /// Number of frames requested so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl FrameReader for ScriptedReader {
    fn read_frame(&mut self) -> io::Result<Vec<u8>> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(kind)) => Err(io::Error::new(kind, "scripted read failure")),
            None => Err(io::Error::new(ErrorKind::UnexpectedEof, "script exhausted")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
