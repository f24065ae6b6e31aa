//! Concurrent in-memory store of driver offers.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{CarpoolError, Result};
use crate::observability::metrics;
use crate::registry::offer::{DriverOffer, DriverOfferInput, GeoPoint};

/// A stored offer plus its registration sequence number.
///
/// The sequence number fixes snapshot order, which the matcher's stable
/// sort relies on for tie-breaking.
#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    offer: DriverOffer,
}

/// Thread-safe registry of live driver offers, keyed by driver id.
///
/// Cloning is cheap and every clone shares the same records, so one
/// registry can be handed to each request handler. Independent registries
/// are fully isolated from each other.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    inner: Arc<DashMap<String, Slot>>,
    next_seq: Arc<AtomicU64>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted records.
    ///
    /// Records are inserted in the given order. A record that fails
    /// validation or repeats an id already loaded is skipped, so the first
    /// occurrence of an id always wins.
    pub fn rehydrate(records: Vec<DriverOffer>) -> Self {
        let registry = Self::new();
        let total = records.len();
        let mut skipped = 0usize;

        for offer in records {
            if let Err(e) = offer.validate() {
                tracing::warn!(driver_id = %offer.driver_id, error = %e, "Skipping invalid persisted offer");
                skipped += 1;
                continue;
            }
            if let Err(e) = registry.insert(offer) {
                tracing::warn!(error = %e, "Skipping conflicting persisted offer");
                skipped += 1;
            }
        }

        tracing::info!(loaded = total - skipped, skipped, "Registry rehydrated");
        registry
    }

    /// Validate and register a new offer. Returns the driver id.
    pub fn register(&self, input: DriverOfferInput) -> Result<String> {
        let offer = match input.into_offer() {
            Ok(offer) => offer,
            Err(e) => {
                metrics::record_registration("invalid");
                return Err(e);
            }
        };
        self.insert(offer)
    }

    /// Insert an already validated offer, rejecting duplicate ids.
    pub(crate) fn insert(&self, offer: DriverOffer) -> Result<String> {
        let id = offer.driver_id.clone();
        // The entry guard holds a shard write lock; release it before len().
        let inserted = match self.inner.entry(id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(Slot { seq, offer });
                true
            }
        };

        if !inserted {
            metrics::record_registration("duplicate");
            tracing::debug!(driver_id = %id, "Rejected duplicate registration");
            return Err(CarpoolError::Duplicate(id));
        }

        metrics::record_registration("registered");
        metrics::record_registry_size(self.inner.len());
        tracing::debug!(driver_id = %id, "Driver registered");
        Ok(id)
    }

    /// Replace an offer's location.
    pub fn update_location(&self, driver_id: &str, lat: f64, lon: f64) -> Result<()> {
        let location = GeoPoint::new(lat, lon);
        location.validate("lat", "lon")?;

        match self.inner.get_mut(driver_id) {
            Some(mut slot) => {
                slot.offer.location = location;
                tracing::debug!(driver_id, lat, lon, "Driver location updated");
                Ok(())
            }
            None => Err(CarpoolError::NotFound(driver_id.to_string())),
        }
    }

    /// Delete an offer.
    pub fn remove(&self, driver_id: &str) -> Result<()> {
        match self.inner.remove(driver_id) {
            Some(_) => {
                metrics::record_registry_size(self.inner.len());
                tracing::debug!(driver_id, "Driver removed");
                Ok(())
            }
            None => Err(CarpoolError::NotFound(driver_id.to_string())),
        }
    }

    /// Seat lock: subtract `seats` if enough are available.
    ///
    /// Returns `Ok(false)` without mutating when fewer than `seats` remain.
    /// The check and the subtraction happen under the record's write lock.
    pub fn decrement_seats(&self, driver_id: &str, seats: u32) -> Result<bool> {
        if seats == 0 {
            return Err(CarpoolError::validation("seats", "must be a positive integer"));
        }

        let mut slot = self
            .inner
            .get_mut(driver_id)
            .ok_or_else(|| CarpoolError::NotFound(driver_id.to_string()))?;

        if slot.offer.seats_available < seats {
            tracing::debug!(
                driver_id,
                requested = seats,
                available = slot.offer.seats_available,
                "Seat lock refused"
            );
            return Ok(false);
        }

        slot.offer.seats_available -= seats;
        tracing::debug!(
            driver_id,
            locked = seats,
            remaining = slot.offer.seats_available,
            "Seats locked"
        );
        Ok(true)
    }

    /// Copy of one offer, if registered.
    pub fn get(&self, driver_id: &str) -> Option<DriverOffer> {
        self.inner.get(driver_id).map(|r| r.value().offer.clone())
    }

    /// Point-in-time copy of all offers, in registration order.
    ///
    /// Each record is copied under its shard lock, so no record is ever
    /// observed half-updated. Mutations racing with the call may or may not
    /// be reflected.
    pub fn snapshot(&self) -> Vec<DriverOffer> {
        let mut slots: Vec<Slot> = self.inner.iter().map(|r| r.value().clone()).collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.offer).collect()
    }

    /// Drop every offer whose departure is strictly before `cutoff`
    /// (epoch seconds). Returns how many were removed.
    pub fn purge_departed_before(&self, cutoff: i64) -> usize {
        let mut purged = 0usize;
        self.inner.retain(|_, slot| {
            let keep = slot.offer.departure_time >= cutoff;
            if !keep {
                purged += 1;
            }
            keep
        });

        if purged > 0 {
            metrics::record_registry_size(self.inner.len());
            tracing::info!(purged, cutoff, "Purged departed offers");
        }
        purged
    }

    /// Number of live offers.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no offers are live.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
