//! High score and session log storage
//!
//! Features:
//! - `RecordStore` trait over the two flat tables
//! - In-memory store (tests, sessions without storage)
//! - JSON file store with tmp-then-rename writes
//! - Background `RecordWriter` so the game loop never waits on storage

mod worker;

pub use worker::RecordWriter;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::highscores::{Records, SessionRecord};

/// Storage failure
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("record file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record store lock poisoned")]
    Poisoned,
}

/// Backend for the high score row and the session log
pub trait RecordStore {
    /// Best score so far, `None` if nothing was ever recorded
    fn high_score(&self) -> Result<Option<u32>, RecordError>;

    /// Append a finished session
    fn record_session(&mut self, score: u32, timestamp_millis: i64) -> Result<(), RecordError>;

    /// Replace the high score iff `score` is strictly greater. Returns true when it changed.
    fn update_high_score_if_greater(&mut self, score: u32) -> Result<bool, RecordError>;

    /// Recorded sessions, newest first
    fn sessions(&self) -> Result<Vec<SessionRecord>, RecordError>;
}

/// Shared in-memory store. Clones see the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Records>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current records
    pub fn records(&self) -> Result<Records, RecordError> {
        let guard = self.records.lock().map_err(|_| RecordError::Poisoned)?;
        Ok(guard.clone())
    }

    fn with<T>(&self, f: impl FnOnce(&mut Records) -> T) -> Result<T, RecordError> {
        let mut guard = self.records.lock().map_err(|_| RecordError::Poisoned)?;
        Ok(f(&mut guard))
    }
}

impl RecordStore for MemoryStore {
    fn high_score(&self) -> Result<Option<u32>, RecordError> {
        self.with(|r| r.high_score)
    }

    fn record_session(&mut self, score: u32, timestamp_millis: i64) -> Result<(), RecordError> {
        self.with(|r| {
            r.record_session(score, timestamp_millis);
        })
    }

    fn update_high_score_if_greater(&mut self, score: u32) -> Result<bool, RecordError> {
        self.with(|r| r.update_high_score_if_greater(score))
    }

    fn sessions(&self) -> Result<Vec<SessionRecord>, RecordError> {
        self.with(|r| r.sessions_newest_first())
    }
}

/// Records kept in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a missing file means no records yet
    pub fn load(&self) -> Result<Records, RecordError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Records::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling tmp file, then rename over the real one
    pub fn save(&self, records: &Records) -> Result<(), RecordError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Records saved to {}", self.path.display());
        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut Records) -> T) -> Result<T, RecordError> {
        let mut records = self.load()?;
        let out = f(&mut records);
        self.save(&records)?;
        Ok(out)
    }
}

impl RecordStore for JsonFileStore {
    fn high_score(&self) -> Result<Option<u32>, RecordError> {
        Ok(self.load()?.high_score)
    }

    fn record_session(&mut self, score: u32, timestamp_millis: i64) -> Result<(), RecordError> {
        self.modify(|r| {
            r.record_session(score, timestamp_millis);
        })
    }

    fn update_high_score_if_greater(&mut self, score: u32) -> Result<bool, RecordError> {
        let mut records = self.load()?;
        if !records.update_high_score_if_greater(score) {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn sessions(&self) -> Result<Vec<SessionRecord>, RecordError> {
        Ok(self.load()?.sessions_newest_first())
    }
}
