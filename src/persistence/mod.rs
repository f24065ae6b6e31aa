//! Durable storage for registry snapshots and ride-request history.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     drivers file → DriverStore::load → DriverRegistry::rehydrate
//!
//! After a mutation (when save_on_mutation):
//!     DriverRegistry::snapshot → DriverStore::save (temp file + rename)
//!
//! City-pair query:
//!     RideRequestRecord → RequestHistory::append
//! ```
//!
//! # Design Decisions
//! - Writes happen after the in-memory mutation and are not atomic with it;
//!   a crash in between leaves file and memory out of step
//! - A failed write is logged and reported, never rolled back in memory
//! - Missing files read as empty
//! - Every file write goes to a sibling temp file that is renamed over the
//!   target, so a crash mid-write never leaves a torn array behind

pub mod drivers;
pub mod history;

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub use drivers::DriverStore;
pub use history::{InMemoryHistory, JsonHistoryFile, RequestHistory, RideRequestRecord};

/// Errors from reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Serialize `value` to a sibling `.json.tmp` file, then rename it over `path`.
///
/// Callers serialize access per path; two concurrent writers would share the
/// temp file.
pub(crate) fn write_json_atomic<T>(path: &Path, value: &T) -> PersistenceResult<()>
where
    T: Serialize + ?Sized,
{
    let tmp = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
