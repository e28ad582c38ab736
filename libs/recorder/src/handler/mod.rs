//! # Handler Stack
//!
//! Ordered sinks consuming finished records: write to storage, print,
//! forward over the network.
//!
//! Handlers are pushed on the front of the stack and popped from the
//! front, so the most recently pushed handler runs first:
//!
//! ```text
//! push(A); push(B)   →   [B, A]   →   handle(record): B, then A
//! ```

mod json_lines;
mod tracing_handler;

pub use json_lines::JsonLinesHandler;
pub use tracing_handler::TracingHandler;

use crate::error::{HandlerError, RecorderError};
use std::collections::VecDeque;
use std::fmt::Debug;
use teleinfo_codec::Record;
use tracing::trace;

/// A consumer of finished records
pub trait Handler: Send + Debug {
    /// Consume one record
    fn handle(&mut self, record: &Record) -> Result<(), HandlerError>;

    /// Name used in logs and errors
    fn name(&self) -> &str;
}

/// Front-insert, front-remove stack of handlers
#[derive(Debug, Default)]
pub struct HandlerStack {
    handlers: VecDeque<Box<dyn Handler>>,
}

impl HandlerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a handler on the front, returning the new stack size
    pub fn push(&mut self, handler: Box<dyn Handler>) -> usize {
        trace!(handler = handler.name(), "handler pushed");
        self.handlers.push_front(handler);
        self.handlers.len()
    }

    /// Pop the front handler
    pub fn pop(&mut self) -> Result<Box<dyn Handler>, RecorderError> {
        self.handlers
            .pop_front()
            .ok_or(RecorderError::EmptyHandlerStack)
    }

    /// Hand `record` to every handler, front to back
    ///
    /// The first failing handler stops the dispatch.
    pub fn handle(&mut self, record: &Record) -> Result<(), RecorderError> {
        for handler in self.handlers.iter_mut() {
            handler
                .handle(record)
                .map_err(|source| RecorderError::Handler {
                    handler: handler.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Handler names in dispatch order
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
