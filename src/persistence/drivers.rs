//! Driver snapshot file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::persistence::{write_json_atomic, PersistenceResult};
use crate::registry::DriverOffer;

/// JSON file holding an ordered array of driver offers.
///
/// Writes are serialized, so concurrent saves never interleave in the temp
/// file and the last writer always holds the newest snapshot.
#[derive(Debug)]
pub struct DriverStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DriverStore {
    /// Store backed by the file at `path`; nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the drivers file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every persisted offer. A missing file yields no offers.
    pub fn load(&self) -> PersistenceResult<Vec<DriverOffer>> {
        if !self.path.exists() {
            tracing::info!(path = ?self.path, "No drivers file, starting empty");
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let offers: Vec<DriverOffer> = serde_json::from_reader(reader)?;
        tracing::info!(path = ?self.path, count = offers.len(), "Loaded drivers file");
        Ok(offers)
    }

    /// Replace the file with `offers`.
    pub fn save(&self, offers: &[DriverOffer]) -> PersistenceResult<()> {
        let _guard = self.write_lock.lock().expect("drivers file mutex poisoned");
        self.write(offers)
    }

    /// Take a snapshot under the write lock and save it.
    pub fn save_snapshot<F>(&self, snapshot: F) -> PersistenceResult<()>
    where
        F: FnOnce() -> Vec<DriverOffer>,
    {
        let _guard = self.write_lock.lock().expect("drivers file mutex poisoned");
        self.write(&snapshot())
    }

    fn write(&self, offers: &[DriverOffer]) -> PersistenceResult<()> {
        write_json_atomic(&self.path, offers)?;
        tracing::debug!(path = ?self.path, count = offers.len(), "Saved drivers file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GeoPoint;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.json", name, uuid::Uuid::new_v4().simple()))
    }

    fn offer(id: &str) -> DriverOffer {
        DriverOffer {
            driver_id: id.to_string(),
            location: GeoPoint::new(28.6139, 77.2090),
            destination: None,
            departure_time: 1_700_000_000,
            seats_available: 3,
            vehicle_label: "Hatchback".to_string(),
            from_city: None,
            to_city: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = DriverStore::new(temp_path("missing_drivers"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let path = temp_path("drivers_persistence");
        let store = DriverStore::new(&path);
        let offers = vec![offer("b"), offer("a"), offer("c")];

        store.save(&offers).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, offers);

        std::fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("drivers_malformed");
        std::fs::write(&path, "{not json").unwrap();

        let err = DriverStore::new(&path).load().unwrap_err();
        assert!(matches!(err, crate::persistence::PersistenceError::Json(_)));

        std::fs::remove_file(path).unwrap_or_default();
    }
}
