//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use carpool_matcher::lifecycle::Services;
use carpool_matcher::registry::{DriverOfferInput, GeoPoint};
use carpool_matcher::{HttpServer, ServiceConfig, Shutdown};

/// Departure time shared by fixtures so window checks stay deterministic.
pub const T0: i64 = 1_700_000_000;

/// Start the service on an ephemeral local port.
///
/// The returned `Shutdown` stops the server when triggered or dropped.
pub async fn spawn_server(config: ServiceConfig, services: Services) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, services);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    wait_until_ready(addr).await;
    (addr, shutdown)
}

async fn wait_until_ready(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {} did not start", addr);
}

/// Registration payload with sensible defaults.
pub fn offer_input(driver_id: &str, lat: f64, lon: f64, seats: i64) -> DriverOfferInput {
    DriverOfferInput {
        driver_id: driver_id.to_string(),
        location: GeoPoint::new(lat, lon),
        destination: None,
        departure_time: T0,
        seats,
        vehicle_label: "Sedan".to_string(),
        from_city: None,
        to_city: None,
    }
}
