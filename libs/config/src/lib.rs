//! # Teleinfo Recorder Configuration
//!
//! Layered settings for the recorder service and the defaults they fall
//! back to.
//!
//! ## Usage
//!
//! ```no_run
//! use teleinfo_config::{load_config, ProcessorMode};
//!
//! let settings = load_config(Some("production")).unwrap();
//! assert!(!settings.counter.name.is_empty());
//! let drains = settings.counter.processor_mode == ProcessorMode::DrainOnce;
//! # let _ = drains;
//! ```

pub mod defaults;
pub mod settings;

// Re-export commonly used types
pub use settings::{
    load_config, CostSettings, CounterSettings, GlobalConfig, HandlerSettings, LogFormat,
    ReaderSettings, RecorderSettings,
};

// Processor lifetime is owned by the pipeline, settings only select it
pub use teleinfo_recorder::ProcessorMode;
