//! `HotelFinder` - find hotels around a place
//!
//! This library resolves free-text locations, gathers nearby hotels from a
//! places service (or generates sample ones when that is unavailable), ranks
//! them by great-circle distance and formats them for display.

pub mod api;
pub mod config;
pub mod distance;
pub mod error;
pub mod finder;
pub mod geocoding;
pub mod google;
pub mod hotels;
pub mod models;
pub mod presentation;
pub mod random;
pub mod routing;
pub mod session;
pub mod web;

// Re-export core types for public API
pub use config::{AggregatorMode, HotelFinderConfig};
pub use error::HotelFinderError;
pub use finder::{Directions, DistanceKind, HotelFinder, SearchResults};
pub use geocoding::{Geocoder, GeocodingProvider, LocationParser};
pub use hotels::{HotelAggregator, HotelSearch, HotelSource, RemoteAggregator, SyntheticAggregator};
pub use models::{Coordinate, HotelRecord, LocationSource, ResolvedLocation, Review};
pub use presentation::{DirectionsProvider, HotelView};
pub use routing::{LocationIqClient, Route, RoutingProvider};
pub use session::{SearchSession, SearchState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, HotelFinderError>;
