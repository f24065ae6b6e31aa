//! Coarse matching on named origin and destination cities.

use serde::{Deserialize, Serialize};

use crate::clock::unix_now;
use crate::error::{CarpoolError, Result};
use crate::observability::metrics;
use crate::persistence::{RequestHistory, RideRequestRecord};
use crate::registry::DriverOffer;

fn default_seats() -> i64 {
    1
}

/// A city-pair query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPairQuery {
    pub from: String,
    pub to: String,
    /// Signed so a negative count reports the field instead of failing to decode.
    #[serde(default = "default_seats")]
    pub seats: i64,
}

impl CityPairQuery {
    /// Query for `seats` seats from `from` to `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>, seats: u32) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            seats: i64::from(seats),
        }
    }
}

/// Offers whose `from_city`/`to_city` equal the query exactly and that have
/// enough seats, in snapshot order.
///
/// The query is then appended to `history`. A failed append is logged and
/// does not fail the lookup.
pub fn find_by_city_pair(
    snapshot: &[DriverOffer],
    query: &CityPairQuery,
    history: &dyn RequestHistory,
) -> Result<Vec<DriverOffer>> {
    let seats = CarpoolError::positive_count("seats", query.seats)?;

    let rides: Vec<DriverOffer> = snapshot
        .iter()
        .filter(|offer| {
            offer.from_city.as_deref() == Some(query.from.as_str())
                && offer.to_city.as_deref() == Some(query.to.as_str())
                && offer.seats_available >= seats
        })
        .cloned()
        .collect();

    let record = RideRequestRecord::new(&query.from, &query.to, seats, unix_now());
    if let Err(e) = history.append(record) {
        tracing::warn!(error = %e, from = %query.from, to = %query.to, "Failed to log ride request");
    }

    metrics::record_lookup(
        "city_pair",
        if rides.is_empty() { "no_match" } else { "matched" },
    );
    tracing::debug!(from = %query.from, to = %query.to, rides = rides.len(), "City-pair lookup");
    Ok(rides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{InMemoryHistory, PersistenceResult};
    use crate::registry::GeoPoint;

    fn offer(id: &str, from: &str, to: &str, seats: u32) -> DriverOffer {
        DriverOffer {
            driver_id: id.to_string(),
            location: GeoPoint::new(0.0, 0.0),
            destination: None,
            departure_time: 0,
            seats_available: seats,
            vehicle_label: String::new(),
            from_city: Some(from.to_string()),
            to_city: Some(to.to_string()),
        }
    }

    struct FailingHistory;

    impl RequestHistory for FailingHistory {
        fn append(&self, _record: RideRequestRecord) -> PersistenceResult<()> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn test_exact_city_match_with_seats() {
        let snapshot = vec![
            offer("a", "Delhi", "Mumbai", 4),
            offer("b", "Delhi", "Pune", 4),
            offer("c", "delhi", "Mumbai", 4),
            offer("d", "Delhi", "Mumbai", 1),
            offer("e", "Delhi", "Mumbai", 2),
        ];
        let history = InMemoryHistory::default();

        let rides =
            find_by_city_pair(&snapshot, &CityPairQuery::new("Delhi", "Mumbai", 2), &history)
                .unwrap();
        let ids: Vec<&str> = rides.iter().map(|r| r.driver_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "e"]);
    }

    #[test]
    fn test_query_is_logged_even_without_rides() {
        let history = InMemoryHistory::default();
        let rides = find_by_city_pair(&[], &CityPairQuery::new("Agra", "Goa", 3), &history).unwrap();
        assert!(rides.is_empty());

        let records = history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].origin, "Agra");
        assert_eq!(records[0].destination, "Goa");
        assert_eq!(records[0].seats, 3);
    }

    #[test]
    fn test_history_failure_does_not_fail_lookup() {
        let snapshot = vec![offer("a", "X", "Y", 1)];
        let rides = find_by_city_pair(&snapshot, &CityPairQuery::new("X", "Y", 1), &FailingHistory)
            .unwrap();
        assert_eq!(rides.len(), 1);
    }

    #[test]
    fn test_zero_seats_rejected() {
        let history = InMemoryHistory::default();
        let err = find_by_city_pair(&[], &CityPairQuery::new("X", "Y", 0), &history).unwrap_err();
        assert!(matches!(err, CarpoolError::Validation { field: "seats", .. }));
        assert!(history.records().is_empty());
    }

    #[test]
    fn test_default_seats_is_one() {
        let query: CityPairQuery = serde_json::from_str(r#"{"from":"A","to":"B"}"#).unwrap();
        assert_eq!(query.seats, 1);
    }
}
