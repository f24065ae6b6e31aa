//! Driver registry subsystem.
//!
//! # Data Flow
//! ```text
//! DriverOfferInput (boundary payload)
//!     → offer.rs (validate once, build DriverOffer)
//!     → store.rs (insert into sharded map, reject duplicate ids)
//!
//! Mutations (update_location, decrement_seats, remove)
//!     → per-record write lock inside the map shard
//!
//! snapshot()
//!     → copy every record under its shard read lock
//!     → order by registration sequence
//!     → handed to the matcher, which never touches the map
//! ```
//!
//! # Design Decisions
//! - Duplicate registrations are rejected, never overwritten
//! - Locking is per record, so `decrement_seats` is atomic against other
//!   decrements and removals of the same id
//! - Snapshots are copies; ranking never runs under a registry lock
//! - Departed offers are kept until `purge_departed_before` is called

pub mod offer;
pub mod seed;
pub mod store;

pub use offer::{DriverOffer, DriverOfferInput, GeoPoint};
pub use store::DriverRegistry;
