//! Road routing between two points
//!
//! A [`RoutingProvider`] turns an origin/destination pair into a driving
//! distance and duration. It is optional: without one, directions carry the
//! straight-line distance only.

pub mod locationiq;

use async_trait::async_trait;

use crate::Result;
use crate::models::Coordinate;

pub use locationiq::LocationIqClient;

/// Driving route summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    /// Road distance, one decimal
    pub distance_km: f64,
    pub duration_minutes: u32,
}

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route>;
}
