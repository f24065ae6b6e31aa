//! Seat locking followed by snapshot persistence.
//!
//! The decrement and the file write are two separate steps. If the process
//! dies between them, or the write fails, the in-memory seat count and the
//! drivers file disagree until the next successful save. The decrement is
//! never rolled back.

use serde::Serialize;

use crate::error::Result;
use crate::observability::metrics;
use crate::persistence::DriverStore;
use crate::registry::DriverRegistry;

/// Result of a seat lock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeatLockOutcome {
    /// Seats were subtracted. `persisted` is false when no store is
    /// configured or the snapshot write failed.
    Locked { persisted: bool },
    /// Not enough seats; nothing changed.
    Failed,
}

impl SeatLockOutcome {
    /// Whether seats were subtracted.
    pub fn is_locked(&self) -> bool {
        matches!(self, SeatLockOutcome::Locked { .. })
    }
}

/// Lock `seats` on `driver_id`, then write the registry snapshot to `store`.
pub fn lock_seats(
    registry: &DriverRegistry,
    store: Option<&DriverStore>,
    driver_id: &str,
    seats: u32,
) -> Result<SeatLockOutcome> {
    if !registry.decrement_seats(driver_id, seats)? {
        metrics::record_seat_lock("failed");
        return Ok(SeatLockOutcome::Failed);
    }
    metrics::record_seat_lock("locked");

    let persisted = match store {
        Some(store) => persist_snapshot(registry, store),
        None => false,
    };
    Ok(SeatLockOutcome::Locked { persisted })
}

/// Write the current snapshot, logging instead of propagating failures.
pub fn persist_snapshot(registry: &DriverRegistry, store: &DriverStore) -> bool {
    match store.save_snapshot(|| registry.snapshot()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = ?store.path(), error = %e, "Failed to persist driver snapshot");
            false
        }
    }
}
