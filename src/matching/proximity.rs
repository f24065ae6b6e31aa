//! Geospatial matching: pickup proximity, departure window, seat count.

use serde::{Deserialize, Serialize};

use crate::config::MatchingConfig;
use crate::error::{CarpoolError, Result};
use crate::matching::distance::{haversine_km, round_km};
use crate::observability::metrics;
use crate::registry::{DriverOffer, GeoPoint};

/// A passenger's query.
///
/// `max_distance_km` and `top_n` fall back to the configured defaults when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRequest {
    /// Pickup point.
    pub location: GeoPoint,
    #[serde(default)]
    pub destination: Option<GeoPoint>,
    /// Epoch seconds.
    pub requested_time: i64,
    /// Signed so a negative count reports the field instead of failing to decode.
    pub seats_needed: i64,
    #[serde(default)]
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl PassengerRequest {
    /// Request using the configured radius and result cap.
    pub fn new(location: GeoPoint, requested_time: i64, seats_needed: u32) -> Self {
        Self {
            location,
            destination: None,
            requested_time,
            seats_needed: i64::from(seats_needed),
            max_distance_km: None,
            top_n: None,
        }
    }

    /// Override the configured search radius.
    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    /// Override the configured result cap.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedDriver {
    pub driver_id: String,
    pub vehicle_label: String,
    pub location: GeoPoint,
    pub departure_time: i64,
    pub seats_available: u32,
    /// Rounded to two decimals.
    pub distance_km: f64,
}

/// Why a well-formed query produced no candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    NoSuitableDrivers,
}

impl NoMatchReason {
    /// Human-readable reason returned to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoMatchReason::NoSuitableDrivers => "no suitable drivers found",
        }
    }
}

impl std::fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a proximity query.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// At least one offer passed every filter; ascending by distance.
    Matched(Vec<MatchedDriver>),
    /// The query ran but nothing qualified.
    NoMatch(NoMatchReason),
}

impl MatchOutcome {
    /// Whether at least one driver matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    /// Ranked drivers; empty for `NoMatch`.
    pub fn drivers(&self) -> &[MatchedDriver] {
        match self {
            MatchOutcome::Matched(drivers) => drivers,
            MatchOutcome::NoMatch(_) => &[],
        }
    }
}

/// Rank the offers in `snapshot` for `request`.
///
/// Filters on seats, the departure window and the unrounded haversine
/// distance, sorts ascending by that distance (stable, so ties keep
/// snapshot order) and keeps the first `top_n`.
pub fn find_by_proximity(
    snapshot: &[DriverOffer],
    request: &PassengerRequest,
    config: &MatchingConfig,
) -> Result<MatchOutcome> {
    let max_distance_km = request
        .max_distance_km
        .unwrap_or(config.default_max_distance_km);
    let top_n = request.top_n.unwrap_or(config.default_top_n);
    let seats_needed = validate_request(request, max_distance_km, top_n)?;

    let mut candidates: Vec<(f64, &DriverOffer)> = snapshot
        .iter()
        .filter(|offer| offer.seats_available >= seats_needed)
        .filter(|offer| {
            offer.departure_time.abs_diff(request.requested_time) <= config.time_window_secs
        })
        .filter_map(|offer| {
            let distance = haversine_km(request.location, offer.location);
            (distance <= max_distance_km).then_some((distance, offer))
        })
        .collect();

    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates.truncate(top_n);

    if candidates.is_empty() {
        metrics::record_lookup("proximity", "no_match");
        tracing::debug!(
            seats_needed,
            max_distance_km,
            scanned = snapshot.len(),
            "No proximity match"
        );
        return Ok(MatchOutcome::NoMatch(NoMatchReason::NoSuitableDrivers));
    }

    let drivers: Vec<MatchedDriver> = candidates
        .into_iter()
        .map(|(distance, offer)| MatchedDriver {
            driver_id: offer.driver_id.clone(),
            vehicle_label: offer.vehicle_label.clone(),
            location: offer.location,
            departure_time: offer.departure_time,
            seats_available: offer.seats_available,
            distance_km: round_km(distance),
        })
        .collect();

    metrics::record_lookup("proximity", "matched");
    tracing::debug!(
        matched = drivers.len(),
        scanned = snapshot.len(),
        "Proximity match"
    );
    Ok(MatchOutcome::Matched(drivers))
}

/// Returns the seat count narrowed to `u32`.
fn validate_request(request: &PassengerRequest, max_distance_km: f64, top_n: usize) -> Result<u32> {
    request.location.validate("location.lat", "location.lon")?;
    if let Some(destination) = &request.destination {
        destination.validate("destination.lat", "destination.lon")?;
    }
    let seats_needed = CarpoolError::positive_count("seats_needed", request.seats_needed)?;
    if !max_distance_km.is_finite() || max_distance_km < 0.0 {
        return Err(CarpoolError::validation(
            "max_distance_km",
            format!("must be a finite, non-negative number, got {max_distance_km}"),
        ));
    }
    if top_n == 0 {
        return Err(CarpoolError::validation("top_n", "must be at least 1"));
    }
    Ok(seats_needed)
}
