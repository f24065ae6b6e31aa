//! Ride-request history log.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::persistence::{write_json_atomic, PersistenceError, PersistenceResult};

/// One logged city-pair query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideRequestRecord {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub seats: u32,
    /// Epoch seconds.
    pub timestamp: i64,
}

impl RideRequestRecord {
    /// Build a record with a fresh id.
    pub fn new(origin: &str, destination: &str, seats: u32, timestamp: i64) -> Self {
        Self {
            id: format!("req_{}", uuid::Uuid::new_v4().simple()),
            origin: origin.to_string(),
            destination: destination.to_string(),
            seats,
            timestamp,
        }
    }
}

/// Append-only sink for ride-request records.
pub trait RequestHistory: Send + Sync {
    fn append(&self, record: RideRequestRecord) -> PersistenceResult<()>;
}

/// Bounded in-memory history; the oldest records are dropped first.
pub struct InMemoryHistory {
    records: Mutex<VecDeque<RideRequestRecord>>,
    capacity: usize,
}

impl InMemoryHistory {
    pub const DEFAULT_CAPACITY: usize = 10_000;

    /// Keep at most `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Copy of the retained records, oldest first.
    pub fn records(&self) -> Vec<RideRequestRecord> {
        let records = self.records.lock().expect("history mutex poisoned");
        records.iter().cloned().collect()
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl RequestHistory for InMemoryHistory {
    fn append(&self, record: RideRequestRecord) -> PersistenceResult<()> {
        let mut records = self.records.lock().expect("history mutex poisoned");
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Ok(())
    }
}

/// History kept as a JSON array on disk.
///
/// Each append rewrites the whole file through a temp file and rename;
/// appends are serialized through a mutex so concurrent queries cannot drop
/// each other's records. A file that no longer parses is moved aside to
/// `*.json.corrupt` and the log restarts empty.
pub struct JsonHistoryFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonHistoryFile {
    /// History backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in the file, oldest first. A missing file is empty.
    pub fn load(&self) -> PersistenceResult<Vec<RideRequestRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl RequestHistory for JsonHistoryFile {
    fn append(&self, record: RideRequestRecord) -> PersistenceResult<()> {
        let _guard = self.write_lock.lock().expect("history file mutex poisoned");
        let mut records = match self.load() {
            Ok(records) => records,
            Err(PersistenceError::Json(e)) => {
                let aside = self.path.with_extension("json.corrupt");
                tracing::warn!(
                    path = ?self.path,
                    moved_to = ?aside,
                    error = %e,
                    "History file unreadable, starting a new one"
                );
                fs::rename(&self.path, &aside)?;
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        records.push(record);
        write_json_atomic(&self.path, &records)
    }
}
