//! Location model for geographic coordinates and resolved search locations

use serde::{Deserialize, Serialize};

use crate::{HotelFinderError, Result};

/// A point on the globe in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude, -90 to 90
    pub lat: f64,
    /// Longitude, -180 to 180
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside the valid ranges
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that latitude and longitude are finite and within range
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(HotelFinderError::validation(format!(
                "Latitude must be between -90 and 90, got: {}",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(HotelFinderError::validation(format!(
                "Longitude must be between -180 and 180, got: {}",
                self.lng
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Format as `"lat, lng"` with four decimals
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Which strategy produced a resolved location
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LocationSource {
    /// Remote geocoding service
    Remote,
    /// Static table of known city names
    KnownCity,
    /// Jittered default coordinate
    Approximate,
    /// Raw coordinates without a looked-up address
    Coordinates,
}

/// A search location the hotel lookup is anchored to
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub display_address: String,
    pub country: Option<String>,
    pub source: LocationSource,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(coordinate: Coordinate, display_address: String, source: LocationSource) -> Self {
        Self {
            coordinate,
            display_address,
            country: None,
            source,
        }
    }

    #[must_use]
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    /// Location named by its own coordinates
    #[must_use]
    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        Self::new(
            coordinate,
            coordinate.format_coordinates(),
            LocationSource::Coordinates,
        )
    }
}
