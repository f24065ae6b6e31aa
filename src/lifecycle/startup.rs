//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the persistence collaborators named in config
//! - Rehydrate the registry from the drivers file
//! - Apply the optional departed-offer purge and demo seeding
//!
//! # Design Decisions
//! - Fail fast: an unreadable drivers file is fatal at startup
//! - Conflicting persisted records are skipped, not fatal

use std::sync::Arc;
use thiserror::Error;

use crate::booking::persist_snapshot;
use crate::clock::unix_now;
use crate::config::ServiceConfig;
use crate::persistence::{
    DriverStore, InMemoryHistory, JsonHistoryFile, PersistenceError, RequestHistory,
};
use crate::registry::seed::seed_demo_drivers;
use crate::registry::DriverRegistry;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load drivers file: {0}")]
    Persistence(#[from] PersistenceError),
}

/// The core collaborators a server runs on.
#[derive(Clone)]
pub struct Services {
    pub registry: DriverRegistry,
    pub store: Option<Arc<DriverStore>>,
    pub history: Arc<dyn RequestHistory>,
}

impl Services {
    /// In-memory services with nothing persisted.
    pub fn in_memory() -> Self {
        Self {
            registry: DriverRegistry::new(),
            store: None,
            history: Arc::new(InMemoryHistory::default()),
        }
    }
}

/// Build the registry and its collaborators from config.
pub fn bootstrap(config: &ServiceConfig) -> Result<Services, StartupError> {
    let store = config
        .persistence
        .drivers_path
        .as_ref()
        .map(|path| Arc::new(DriverStore::new(path)));

    let registry = match &store {
        Some(store) => DriverRegistry::rehydrate(store.load()?),
        None => DriverRegistry::new(),
    };

    let mut changed = false;
    let now = unix_now();

    if let Some(secs) = config.matching.purge_departed_after_secs {
        let cutoff = now.saturating_sub(i64::try_from(secs).unwrap_or(i64::MAX));
        changed |= registry.purge_departed_before(cutoff) > 0;
    }

    if registry.is_empty() && config.seed.demo_drivers > 0 {
        changed |= seed_demo_drivers(&registry, config.seed.demo_drivers, now) > 0;
    }

    if changed {
        if let Some(store) = &store {
            persist_snapshot(&registry, store);
        }
    }

    let history: Arc<dyn RequestHistory> = match &config.persistence.history_path {
        Some(path) => Arc::new(JsonHistoryFile::new(path)),
        None => Arc::new(InMemoryHistory::default()),
    };

    tracing::info!(
        drivers = registry.len(),
        persisted = store.is_some(),
        "Services initialized"
    );

    Ok(Services {
        registry,
        store,
        history,
    })
}
