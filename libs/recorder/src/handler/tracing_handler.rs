use super::Handler;
use crate::error::HandlerError;
use teleinfo_codec::Record;
use tracing::info;

/// Prints every record as a structured log event
#[derive(Debug, Clone)]
pub struct TracingHandler {
    counter: String,
}

impl TracingHandler {
    pub fn new(counter: impl Into<String>) -> Self {
        Self {
            counter: counter.into(),
        }
    }
}

impl Handler for TracingHandler {
    fn handle(&mut self, record: &Record) -> Result<(), HandlerError> {
        let fields = serde_json::to_string(record)?;
        info!(counter = %self.counter, record = %fields, "teleinfo record");
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
