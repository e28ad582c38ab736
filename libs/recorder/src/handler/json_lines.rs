//! Append-only JSON lines persistence

use super::Handler;
use crate::error::HandlerError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use teleinfo_codec::Record;
use tracing::debug;

/// Appends every record to a file as one JSON object per line
#[derive(Debug)]
pub struct JsonLinesHandler {
    path: PathBuf,
    file: File,
}

impl JsonLinesHandler {
    /// Open `path` for appending, creating it and its parent directories
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Handler for JsonLinesHandler {
    fn handle(&mut self, record: &Record) -> Result<(), HandlerError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        // single write keeps lines whole if another process appends too
        self.file.write_all(&line)?;
        self.file.flush()?;
        debug!(path = %self.path.display(), bytes = line.len(), "record appended");
        Ok(())
    }

    fn name(&self) -> &str {
        "json_lines"
    }
}
