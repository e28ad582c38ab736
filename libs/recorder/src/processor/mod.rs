//! # Processor Chain
//!
//! Ordered derivation steps that compute extra record fields.
//!
//! ```text
//! Record → [step 1: key₁] → [step 2: key₂] → ... → Record + derived fields
//!              ↓                 ↓
//!         sees record      sees record + key₁
//! ```
//!
//! Steps run in registration order and each one sees the fields added by
//! the steps before it. In [`ProcessorMode::DrainOnce`] every step is
//! removed from the queue before it runs, so it derives a field for one
//! record only; [`ProcessorMode::Persistent`] keeps the steps registered.

mod cost;

pub use cost::CostProcessor;

use crate::error::{ProcessorError, RecorderError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use teleinfo_codec::{FieldValue, Record};
use tracing::{debug, trace};

/// Lifetime of registered processors
///
/// `DrainOnce` runs each processor for the next record only, then forgets
/// it. `Persistent` keeps processors registered across records.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorMode {
    #[default]
    DrainOnce,
    Persistent,
}

/// A derivation step: computes one value from the current record
pub trait Processor: Send {
    fn process(&mut self, record: &Record) -> Result<FieldValue, ProcessorError>;
}

/// Adapter for closures registered with [`ProcessorChain::push_fn`]
struct FnProcessor<F>(F);

impl<F> Processor for FnProcessor<F>
where
    F: FnMut(&Record) -> Result<FieldValue, ProcessorError> + Send,
{
    fn process(&mut self, record: &Record) -> Result<FieldValue, ProcessorError> {
        (self.0)(record)
    }
}

struct ProcessorEntry {
    key: String,
    processor: Box<dyn Processor>,
}

/// FIFO queue of derivation steps
pub struct ProcessorChain {
    entries: VecDeque<ProcessorEntry>,
    mode: ProcessorMode,
}

impl ProcessorChain {
    pub fn new(mode: ProcessorMode) -> Self {
        Self {
            entries: VecDeque::new(),
            mode,
        }
    }

    pub fn mode(&self) -> ProcessorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProcessorMode) {
        self.mode = mode;
    }

    /// Register a step storing its result under `key`
    ///
    /// Returns the number of queued steps.
    pub fn push(
        &mut self,
        key: impl Into<String>,
        processor: impl Processor + 'static,
    ) -> Result<usize, RecorderError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(RecorderError::configuration(
                "Processors must have a non-empty result key",
            ));
        }

        trace!(%key, "processor registered");
        self.entries.push_back(ProcessorEntry {
            key,
            processor: Box::new(processor),
        });
        Ok(self.entries.len())
    }

    /// Register a closure as a step
    pub fn push_fn<F>(&mut self, key: impl Into<String>, callback: F) -> Result<usize, RecorderError>
    where
        F: FnMut(&Record) -> Result<FieldValue, ProcessorError> + Send + 'static,
    {
        self.push(key, FnProcessor(callback))
    }

    /// Result keys of the queued steps, in run order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every queued step against `record`
    ///
    /// Stops at the first failing step. In drain-once mode the failing
    /// step and those before it are gone from the queue, later ones stay.
    pub fn run_all(&mut self, record: &mut Record) -> Result<(), RecorderError> {
        match self.mode {
            ProcessorMode::DrainOnce => {
                while let Some(mut entry) = self.entries.pop_front() {
                    let value = run_step(&mut entry, record)?;
                    record.insert(entry.key, value);
                }
            }
            ProcessorMode::Persistent => {
                for entry in self.entries.iter_mut() {
                    let value = run_step(entry, record)?;
                    record.insert(entry.key.clone(), value);
                }
            }
        }
        Ok(())
    }
}

fn run_step(entry: &mut ProcessorEntry, record: &Record) -> Result<FieldValue, RecorderError> {
    let value = entry
        .processor
        .process(record)
        .map_err(|source| RecorderError::Processor {
            key: entry.key.clone(),
            source,
        })?;
    debug!(key = %entry.key, %value, "derived field");
    Ok(value)
}

impl Default for ProcessorChain {
    fn default() -> Self {
        Self::new(ProcessorMode::default())
    }
}

impl std::fmt::Debug for ProcessorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorChain")
            .field("mode", &self.mode)
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
