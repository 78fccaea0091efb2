//! Log persistence: one JSON file per recording session.

use crate::error::ReplayResult;
use crate::log::event::EventLog;
use std::fs;
use std::path::{Path, PathBuf};

/// A saved log file, as presented for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Reads and writes event logs in a fixed directory.
///
/// Session files are named `"<prefix> <timestamp>.json"` with the timestamp
/// carrying microsecond precision, so each recording gets its own file.
pub struct LogStore {
    dir: PathBuf,
    prefix: String,
}

impl LogStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a sealed log, returning the path it was written to.
    pub fn save(&self, log: &EventLog) -> ReplayResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let timestamp = chrono::Local::now().format("%m-%d-%Y %H-%M-%S-%6f");
        let path = self.dir.join(format!("{} {}.json", self.prefix, timestamp));

        let data = serde_json::to_vec_pretty(log)?;
        fs::write(&path, data)?;

        tracing::info!(events = log.len(), path = %path.display(), "log saved");
        Ok(path)
    }

    /// List saved sessions matching this store's prefix, sorted by filename.
    ///
    /// A missing directory is not an error; it just means no recordings yet.
    pub fn list(&self) -> ReplayResult<Vec<LogFileInfo>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let lower = name.to_lowercase();
            if lower.starts_with(&self.prefix) && lower.ends_with(".json") {
                files.push(LogFileInfo {
                    name,
                    path: entry.path(),
                });
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Load a previously saved log.
    pub fn load(&self, path: &Path) -> ReplayResult<EventLog> {
        let data = fs::read(path)?;
        let log = serde_json::from_slice(&data)?;
        Ok(log)
    }
}
