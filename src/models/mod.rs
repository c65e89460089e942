//! Data models for the hotel finder
//!
//! - Location: coordinates and resolved search locations
//! - Hotel: hotel records and reviews

pub mod hotel;
pub mod location;

pub use hotel::{HotelRecord, Review};
pub use location::{Coordinate, LocationSource, ResolvedLocation};
