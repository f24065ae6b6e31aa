//! Metrics collection and exposition.
//!
//! # Metrics
//! - `carpool_registrations_total` (counter): registrations by outcome
//! - `carpool_registry_drivers` (gauge): live offers
//! - `carpool_lookups_total` (counter): queries by mode and outcome
//! - `carpool_seat_locks_total` (counter): seat locks by outcome
//! - `carpool_http_requests_total` (counter): requests by method, status
//! - `carpool_http_request_duration_seconds` (histogram): latency
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Count a registration attempt by outcome.
pub fn record_registration(outcome: &'static str) {
    metrics::counter!("carpool_registrations_total", "outcome" => outcome).increment(1);
}

/// Set the live offer gauge.
pub fn record_registry_size(size: usize) {
    metrics::gauge!("carpool_registry_drivers").set(size as f64);
}

/// Count a lookup by mode (`proximity`, `city_pair`) and outcome.
pub fn record_lookup(mode: &'static str, outcome: &'static str) {
    metrics::counter!("carpool_lookups_total", "mode" => mode, "outcome" => outcome).increment(1);
}

/// Count a seat lock attempt by outcome.
pub fn record_seat_lock(outcome: &'static str) {
    metrics::counter!("carpool_seat_locks_total", "outcome" => outcome).increment(1);
}

/// Count an HTTP request and record its latency.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!(
        "carpool_http_requests_total",
        "method" => method.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("carpool_http_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}
