//! Matching engine.
//!
//! # Data Flow
//! ```text
//! DriverRegistry::snapshot()
//!     → proximity.rs (seats → departure window → haversine radius
//!                     → stable sort by distance → top_n)
//!     → MatchOutcome::Matched | MatchOutcome::NoMatch
//!
//! DriverRegistry::snapshot()
//!     → city_pair.rs (exact from/to city equality, seats)
//!     → RequestHistory::append (logged, never fails the query)
//! ```
//!
//! # Design Decisions
//! - Pure functions over a snapshot; no registry lock is held while ranking
//! - Filtering and sorting use the unrounded distance; only the reported
//!   value is rounded to two decimals
//! - The two query modes are separate operations and never share filters

pub mod city_pair;
pub mod distance;
pub mod proximity;

pub use city_pair::{find_by_city_pair, CityPairQuery};
pub use distance::{haversine_km, EARTH_RADIUS_KM};
pub use proximity::{find_by_proximity, MatchOutcome, MatchedDriver, NoMatchReason, PassengerRequest};
