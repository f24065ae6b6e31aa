//! Driver offer types and boundary validation.

use serde::{Deserialize, Serialize};

use crate::error::{CarpoolError, Result};

/// A coordinate pair in decimal degrees (WGS84, no datum conversion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Point from raw coordinates; call `validate` before trusting it.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check finiteness and range. The field names are reported on failure.
    pub fn validate(&self, lat_field: &'static str, lon_field: &'static str) -> Result<()> {
        if !self.lat.is_finite() || self.lat.abs() > 90.0 {
            return Err(CarpoolError::validation(
                lat_field,
                format!("latitude must be a finite number in [-90, 90], got {}", self.lat),
            ));
        }
        if !self.lon.is_finite() || self.lon.abs() > 180.0 {
            return Err(CarpoolError::validation(
                lon_field,
                format!("longitude must be a finite number in [-180, 180], got {}", self.lon),
            ));
        }
        Ok(())
    }
}

/// One advertised ride.
///
/// This is also the persisted record shape: the drivers file is an ordered
/// JSON array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverOffer {
    /// Unique key within a registry.
    pub driver_id: String,
    /// Current pickup position.
    pub location: GeoPoint,
    /// Informational; proximity matching ignores it.
    #[serde(default)]
    pub destination: Option<GeoPoint>,
    /// Epoch seconds.
    pub departure_time: i64,
    pub seats_available: u32,
    /// Opaque, passed through unmodified.
    #[serde(default)]
    pub vehicle_label: String,
    /// Named origin for city-pair queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_city: Option<String>,
    /// Named destination for city-pair queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_city: Option<String>,
}

impl DriverOffer {
    /// Check the invariants every live offer must satisfy.
    ///
    /// Zero seats is allowed here: a fully booked offer stays registered.
    pub fn validate(&self) -> Result<()> {
        if self.driver_id.trim().is_empty() {
            return Err(CarpoolError::validation(
                "driver_id",
                "must be a non-empty string",
            ));
        }
        self.location.validate("location.lat", "location.lon")?;
        if let Some(destination) = &self.destination {
            destination.validate("destination.lat", "destination.lon")?;
        }
        Ok(())
    }
}

/// Registration payload, validated once at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverOfferInput {
    pub driver_id: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub destination: Option<GeoPoint>,
    pub departure_time: i64,
    /// Signed so that non-positive counts surface as a validation error
    /// naming the field rather than a decode failure.
    pub seats: i64,
    #[serde(default)]
    pub vehicle_label: String,
    #[serde(default)]
    pub from_city: Option<String>,
    #[serde(default)]
    pub to_city: Option<String>,
}

impl DriverOfferInput {
    /// Validate the payload and turn it into a live offer.
    pub fn into_offer(self) -> Result<DriverOffer> {
        let seats_available = CarpoolError::positive_count("seats", self.seats)?;

        let offer = DriverOffer {
            driver_id: self.driver_id.trim().to_string(),
            location: self.location,
            destination: self.destination,
            departure_time: self.departure_time,
            seats_available,
            vehicle_label: self.vehicle_label,
            from_city: self.from_city,
            to_city: self.to_city,
        };
        offer.validate()?;
        Ok(offer)
    }
}
