//! Demo data for empty deployments.

use crate::registry::offer::{DriverOffer, GeoPoint};
use crate::registry::store::DriverRegistry;

const DELHI: GeoPoint = GeoPoint { lat: 28.6139, lon: 77.2090 };
const MUMBAI: GeoPoint = GeoPoint { lat: 19.0760, lon: 72.8777 };

/// Seconds between "now" and a demo driver's departure.
const DEMO_DEPARTURE_LEAD_SECS: i64 = 900;

/// Register `count` demo Delhi → Mumbai offers departing shortly after `now`.
///
/// Ids already present are left alone. Returns how many were added.
pub fn seed_demo_drivers(registry: &DriverRegistry, count: usize, now: i64) -> usize {
    let mut added = 0;
    for i in 1..=count {
        let offer = DriverOffer {
            driver_id: format!("Driver{i}"),
            location: DELHI,
            destination: Some(MUMBAI),
            departure_time: now + DEMO_DEPARTURE_LEAD_SECS,
            seats_available: 4,
            vehicle_label: "Sedan".to_string(),
            from_city: Some("Delhi".to_string()),
            to_city: Some("Mumbai".to_string()),
        };
        if registry.insert(offer).is_ok() {
            added += 1;
        }
    }
    tracing::info!(added, "Seeded demo drivers");
    added
}
