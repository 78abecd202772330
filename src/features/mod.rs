//! Feature derivation
//!
//! Stateful rest and travel scans plus the stateless transforms around them.

pub mod distance;
pub mod filter;
pub mod matchup;
pub mod pipeline;
pub mod rest;
pub mod segment;
pub mod travel;

pub use distance::haversine_km;
pub use matchup::Matchup;
pub use pipeline::build_features;
pub use rest::{calculate_rest, RestState};
pub use travel::{calculate_travel, TravelState};
