//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, metrics)
//! - Bind server to listener
//! - Stop accepting on the shutdown signal and drain in-flight requests

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::booking::persist_snapshot;
use crate::config::{MatchingConfig, ServiceConfig};
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::Services;
use crate::observability::metrics;
use crate::persistence::{DriverStore, RequestHistory};
use crate::registry::DriverRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: DriverRegistry,
    pub store: Option<Arc<DriverStore>>,
    pub history: Arc<dyn RequestHistory>,
    pub matching: Arc<MatchingConfig>,
    pub save_on_mutation: bool,
}

impl AppState {
    /// Share `services` across handlers with the matching and persistence settings from `config`.
    pub fn new(services: Services, config: &ServiceConfig) -> Self {
        Self {
            registry: services.registry,
            store: services.store,
            history: services.history,
            matching: Arc::new(config.matching.clone()),
            save_on_mutation: config.persistence.save_on_mutation,
        }
    }

    /// The store to write through, if saving on mutation is enabled.
    pub(crate) fn write_through_store(&self) -> Option<Arc<DriverStore>> {
        if self.save_on_mutation {
            self.store.clone()
        } else {
            None
        }
    }

    /// Write the snapshot on the blocking pool if a store is configured and
    /// saving is enabled.
    ///
    /// Runs after the in-memory mutation has already committed; a failed
    /// write is logged and the mutation stands.
    pub(crate) async fn persist_after_mutation(&self) {
        let Some(store) = self.write_through_store() else {
            return;
        };
        let registry = self.registry.clone();
        let task = tokio::task::spawn_blocking(move || persist_snapshot(&registry, &store));
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Snapshot task failed");
        }
    }
}

/// HTTP server for the matching service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given services.
    pub fn new(config: ServiceConfig, services: Services) -> Self {
        let state = AppState::new(services, &config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/drivers",
                get(handlers::list_drivers).post(handlers::register_driver),
            )
            .route("/drivers/{id}", delete(handlers::remove_driver))
            .route("/drivers/{id}/location", put(handlers::update_location))
            .route("/drivers/{id}/seats/lock", post(handlers::lock_seats))
            .route("/matches/proximity", post(handlers::find_by_proximity))
            .route("/matches/city-pair", post(handlers::find_by_city_pair))
            .with_state(state)
            // Outermost first: the request ID exists before the trace span opens.
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
            // Outside the stack so timeout and body-limit responses are counted too.
            .layer(middleware::from_fn(track_requests))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Record request count and latency.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
