//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the matching service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Matching defaults and filter windows.
    pub matching: MatchingConfig,

    /// Snapshot and ride-request history files.
    pub persistence: PersistenceConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Demo data for empty registries.
    pub seed: SeedConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Matching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Search radius used when a request does not name one.
    pub default_max_distance_km: f64,

    /// Result cap used when a request does not name one.
    pub default_top_n: usize,

    /// Symmetric departure-time window in seconds.
    pub time_window_secs: u64,

    /// Purge offers that departed more than this many seconds ago at
    /// startup. Unset keeps every offer.
    pub purge_departed_after_secs: Option<u64>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_max_distance_km: 5.0,
            default_top_n: 5,
            time_window_secs: 3600,
            purge_departed_after_secs: None,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// JSON file holding the driver snapshot. Unset keeps the registry in
    /// memory only.
    pub drivers_path: Option<PathBuf>,

    /// JSON file receiving city-pair ride requests. Unset keeps a bounded
    /// in-memory history.
    pub history_path: Option<PathBuf>,

    /// Write the snapshot after every successful mutation.
    pub save_on_mutation: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            drivers_path: None,
            history_path: None,
            save_on_mutation: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info" or "carpool_matcher=debug").
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024, // 64KB
        }
    }
}

/// Demo seeding configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of demo drivers to add when the registry starts empty.
    pub demo_drivers: usize,
}
