//! Concurrent access to a shared registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use carpool_matcher::DriverRegistry;

mod common;

#[test]
fn test_concurrent_decrements_exhaust_capacity_exactly() {
    let registry = DriverRegistry::new();
    registry
        .register(common::offer_input("d1", 28.6139, 77.2090, 7))
        .unwrap();

    let successes = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..32)
        .map(|_| {
            let registry = registry.clone();
            let successes = Arc::clone(&successes);
            thread::spawn(move || {
                if registry.decrement_seats("d1", 1).unwrap() {
                    successes.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(successes.load(Ordering::SeqCst), 7);
    assert_eq!(registry.get("d1").unwrap().seats_available, 0);
}

#[test]
fn test_concurrent_mixed_decrements_never_oversell() {
    let registry = DriverRegistry::new();
    registry
        .register(common::offer_input("d1", 28.6139, 77.2090, 10))
        .unwrap();

    let booked = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..24)
        .map(|i| {
            let registry = registry.clone();
            let booked = Arc::clone(&booked);
            let seats = (i % 3 + 1) as u32;
            thread::spawn(move || {
                if registry.decrement_seats("d1", seats).unwrap() {
                    booked.fetch_add(seats as usize, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let remaining = registry.get("d1").unwrap().seats_available as usize;
    assert_eq!(booked.load(Ordering::SeqCst) + remaining, 10);
}

#[test]
fn test_concurrent_registrations_with_same_id_admit_one() {
    let registry = DriverRegistry::new();

    let accepted = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = registry.clone();
            let accepted = Arc::clone(&accepted);
            thread::spawn(move || {
                if registry
                    .register(common::offer_input("same", 19.0760, 72.8777, 3))
                    .is_ok()
                {
                    accepted.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_snapshot_during_writes_is_consistent() {
    let registry = DriverRegistry::new();
    for i in 0..50 {
        registry
            .register(common::offer_input(&format!("d{}", i), 28.6, 77.2, 4))
            .unwrap();
    }

    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            for i in 0..50 {
                let id = format!("d{}", i);
                registry.update_location(&id, 28.7, 77.3).unwrap();
                registry.decrement_seats(&id, 1).unwrap();
            }
        })
    };

    for _ in 0..20 {
        for offer in registry.snapshot() {
            assert!(offer.seats_available == 3 || offer.seats_available == 4);
            assert!(offer.location.lat == 28.6 || offer.location.lat == 28.7);
        }
    }

    writer.join().unwrap();
    assert!(registry.snapshot().iter().all(|o| o.seats_available == 3));
}

#[test]
fn test_decrements_racing_remove_stay_consistent() {
    use carpool_matcher::CarpoolError;

    for remove_after in 0..12 {
        let registry = DriverRegistry::new();
        registry
            .register(common::offer_input("d1", 28.6139, 77.2090, 6))
            .unwrap();

        let booked = Arc::new(AtomicUsize::new(0));
        let mut decrementers = Vec::new();
        let mut remover = None;

        for i in 0..12 {
            if i == remove_after {
                let registry = registry.clone();
                remover = Some(thread::spawn(move || registry.remove("d1")));
            }
            let registry = registry.clone();
            let booked = Arc::clone(&booked);
            decrementers.push(thread::spawn(move || {
                match registry.decrement_seats("d1", 1) {
                    Ok(true) => {
                        booked.fetch_add(1, Ordering::SeqCst);
                    }
                    Ok(false) => {}
                    Err(CarpoolError::NotFound(id)) => assert_eq!(id, "d1"),
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }));
        }

        for handle in decrementers {
            handle.join().unwrap();
        }
        assert!(remover.unwrap().join().unwrap().is_ok());

        assert!(booked.load(Ordering::SeqCst) <= 6);
        assert!(registry.get("d1").is_none());
        assert!(registry.snapshot().is_empty());
        assert_eq!(
            registry.decrement_seats("d1", 1),
            Err(CarpoolError::NotFound("d1".to_string()))
        );
    }
}
