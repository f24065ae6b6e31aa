//! Properties of the proximity matcher over generated registries.

use carpool_matcher::config::MatchingConfig;
use carpool_matcher::matching::{find_by_proximity, haversine_km, MatchOutcome, PassengerRequest};
use carpool_matcher::registry::{DriverOfferInput, GeoPoint};
use carpool_matcher::DriverRegistry;

mod common;

use common::T0;

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn populated_registry(seed: u64, count: usize) -> DriverRegistry {
    let mut rng = Lcg(seed);
    let registry = DriverRegistry::new();
    for i in 0..count {
        let input = DriverOfferInput {
            driver_id: format!("d{}", i),
            location: GeoPoint::new(rng.range(28.55, 28.68), rng.range(77.15, 77.28)),
            destination: None,
            departure_time: T0 + rng.range(-7200.0, 7200.0) as i64,
            seats: 1 + (rng.range(0.0, 6.0) as i64),
            vehicle_label: "Hatchback".to_string(),
            from_city: None,
            to_city: None,
        };
        registry.register(input).unwrap();
    }
    registry
}

#[test]
fn test_haversine_symmetry_and_identity_over_samples() {
    let mut rng = Lcg(7);
    for _ in 0..200 {
        let a = GeoPoint::new(rng.range(-90.0, 90.0), rng.range(-180.0, 180.0));
        let b = GeoPoint::new(rng.range(-90.0, 90.0), rng.range(-180.0, 180.0));
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        assert_eq!(haversine_km(a, a), 0.0);
        assert!(haversine_km(a, b) >= 0.0);
    }
}

#[test]
fn test_results_respect_every_filter() {
    let config = MatchingConfig::default();
    let pickup = GeoPoint::new(28.6139, 77.2090);

    for seed in 1..20 {
        let registry = populated_registry(seed, 60);
        let snapshot = registry.snapshot();

        for seats_needed in 1..=4 {
            let request = PassengerRequest::new(pickup, T0, seats_needed)
                .with_max_distance_km(4.0)
                .with_top_n(8);
            let outcome = find_by_proximity(&snapshot, &request, &config).unwrap();

            let drivers = outcome.drivers();
            assert!(drivers.len() <= 8);
            for matched in drivers {
                let offer = registry.get(&matched.driver_id).unwrap();
                assert!(offer.seats_available >= seats_needed);
                assert!(offer.departure_time.abs_diff(T0) <= config.time_window_secs);
                assert!(haversine_km(pickup, offer.location) <= 4.0);
                assert!(matched.distance_km <= 4.0);
            }
            for pair in drivers.windows(2) {
                assert!(pair[0].distance_km <= pair[1].distance_km);
            }
        }
    }
}

#[test]
fn test_no_eligible_offer_is_left_out_below_top_n() {
    let config = MatchingConfig::default();
    let pickup = GeoPoint::new(28.6139, 77.2090);
    let registry = populated_registry(99, 40);
    let snapshot = registry.snapshot();

    let request = PassengerRequest::new(pickup, T0, 1)
        .with_max_distance_km(50.0)
        .with_top_n(1000);
    let outcome = find_by_proximity(&snapshot, &request, &config).unwrap();

    let expected = snapshot
        .iter()
        .filter(|o| o.departure_time.abs_diff(T0) <= config.time_window_secs)
        .count();
    assert_eq!(outcome.drivers().len(), expected);
}

#[test]
fn test_snapshot_is_idempotent_without_mutation() {
    let registry = populated_registry(3, 25);
    assert_eq!(registry.snapshot(), registry.snapshot());
}

#[test]
fn test_worked_examples() {
    let config = MatchingConfig::default();
    let registry = DriverRegistry::new();
    registry
        .register(common::offer_input("delhi", 28.6139, 77.2090, 4))
        .unwrap();

    let at_offer = GeoPoint::new(28.6139, 77.2090);
    let request = PassengerRequest::new(at_offer, T0, 2).with_max_distance_km(5.0);
    let outcome = find_by_proximity(&registry.snapshot(), &request, &config).unwrap();
    assert!(outcome.is_matched());
    assert_eq!(outcome.drivers()[0].driver_id, "delhi");
    assert_eq!(outcome.drivers()[0].distance_km, 0.0);

    let request = PassengerRequest::new(at_offer, T0, 5).with_max_distance_km(5.0);
    match find_by_proximity(&registry.snapshot(), &request, &config).unwrap() {
        MatchOutcome::NoMatch(reason) => assert_eq!(reason.as_str(), "no suitable drivers found"),
        MatchOutcome::Matched(drivers) => panic!("unexpected match: {:?}", drivers),
    }

    assert!(!registry.decrement_seats("delhi", 5).unwrap());
    assert_eq!(registry.get("delhi").unwrap().seats_available, 4);
}

#[test]
fn test_nearer_offer_ranks_first() {
    let config = MatchingConfig::default();
    let registry = DriverRegistry::new();
    // One degree of latitude is roughly 111.19 km.
    registry
        .register(common::offer_input("far", 28.6139 + 1.2 / 111.19, 77.2090, 3))
        .unwrap();
    registry
        .register(common::offer_input("near", 28.6139 + 0.3 / 111.19, 77.2090, 3))
        .unwrap();

    let request = PassengerRequest::new(GeoPoint::new(28.6139, 77.2090), T0, 1).with_top_n(5);
    let outcome = find_by_proximity(&registry.snapshot(), &request, &config).unwrap();

    let ids: Vec<_> = outcome.drivers().iter().map(|d| d.driver_id.as_str()).collect();
    assert_eq!(ids, vec!["near", "far"]);
    assert!((outcome.drivers()[0].distance_km - 0.3).abs() < 0.01);
    assert!((outcome.drivers()[1].distance_km - 1.2).abs() < 0.01);
}
