//! Carpool driver registry and matching engine.
//!
//! A concurrently shared store of driver offers ([`DriverRegistry`]) plus
//! pure query functions that rank offers for a passenger by pickup
//! distance, departure window and seat count ([`matching`]). The HTTP,
//! persistence and lifecycle modules wrap that core as a service.

// Core
pub mod error;
pub mod matching;
pub mod registry;

// Collaborators
pub mod booking;
pub mod http;
pub mod persistence;

// Cross-cutting concerns
pub mod clock;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use error::{CarpoolError, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::DriverRegistry;
