//! Static table of well-known cities used when remote geocoding is unavailable

use crate::models::{Coordinate, LocationSource, ResolvedLocation};

struct KnownCity {
    key: &'static str,
    name: &'static str,
    country: &'static str,
    lat: f64,
    lng: f64,
}

const fn city(
    key: &'static str,
    name: &'static str,
    country: &'static str,
    lat: f64,
    lng: f64,
) -> KnownCity {
    KnownCity {
        key,
        name,
        country,
        lat,
        lng,
    }
}

// Keys are lower-case
const KNOWN_CITIES: &[KnownCity] = &[
    city("london", "London", "United Kingdom", 51.5074, -0.1278),
    city("paris", "Paris", "France", 48.8566, 2.3522),
    city("berlin", "Berlin", "Germany", 52.5200, 13.4050),
    city("madrid", "Madrid", "Spain", 40.4168, -3.7038),
    city("rome", "Rome", "Italy", 41.9028, 12.4964),
    city("amsterdam", "Amsterdam", "Netherlands", 52.3676, 4.9041),
    city("new york", "New York", "United States", 40.7128, -74.0060),
    city("nyc", "New York", "United States", 40.7128, -74.0060),
    city("los angeles", "Los Angeles", "United States", 34.0522, -118.2437),
    city("san francisco", "San Francisco", "United States", 37.7749, -122.4194),
    city("chicago", "Chicago", "United States", 41.8781, -87.6298),
    city("toronto", "Toronto", "Canada", 43.6532, -79.3832),
    city("tokyo", "Tokyo", "Japan", 35.6762, 139.6503),
    city("singapore", "Singapore", "Singapore", 1.3521, 103.8198),
    city("dubai", "Dubai", "United Arab Emirates", 25.2048, 55.2708),
    city("mumbai", "Mumbai", "India", 19.0760, 72.8777),
    city("delhi", "Delhi", "India", 28.7041, 77.1025),
    city("new delhi", "New Delhi", "India", 28.6139, 77.2090),
    city("bangalore", "Bangalore", "India", 12.9716, 77.5946),
    city("sydney", "Sydney", "Australia", -33.8688, 151.2093),
];

/// Look up a city by name, ignoring case and surrounding whitespace
#[must_use]
pub fn lookup(query: &str) -> Option<ResolvedLocation> {
    let key = query.trim().to_lowercase();
    KNOWN_CITIES.iter().find(|city| city.key == key).map(|city| {
        ResolvedLocation::new(
            Coordinate {
                lat: city.lat,
                lng: city.lng,
            },
            format!("{}, {}", city.name, city.country),
            LocationSource::KnownCity,
        )
        .with_country(Some(city.country.to_string()))
    })
}
