//! Location resolution
//!
//! Resolves free-text location inputs into [`ResolvedLocation`]s. A remote
//! provider is tried first; failures degrade to a static table of known
//! cities and finally to a jittered default coordinate, so resolution only
//! fails for blank input.

pub mod known_cities;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::models::{Coordinate, LocationSource, ResolvedLocation};
use crate::random::RandomSource;
use crate::{HotelFinderError, Result};

/// One match returned by a geocoding provider
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub coordinate: Coordinate,
    pub formatted_address: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl GeocodeCandidate {
    /// Most specific `locality, region, country` text available, then the
    /// provider's formatted address, then the coordinates themselves
    #[must_use]
    pub fn display_address(&self) -> String {
        let parts: Vec<&str> = [&self.locality, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(", ");
        }

        match self.formatted_address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => self.coordinate.format_coordinates(),
        }
    }
}

impl From<GeocodeCandidate> for ResolvedLocation {
    fn from(candidate: GeocodeCandidate) -> Self {
        ResolvedLocation::new(
            candidate.coordinate,
            candidate.display_address(),
            LocationSource::Remote,
        )
        .with_country(candidate.country)
    }
}

/// A remote geocoding service
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Candidates for a free-text query, best first; empty when nothing matched
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>>;

    /// Candidates describing the given coordinate, best first
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Vec<GeocodeCandidate>>;
}

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Already a coordinate pair
    Coordinates(Coordinate),
    /// Place name or address
    Name(String),
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Classify trimmed input as coordinates or a place name
    #[must_use]
    pub fn parse(input: &str) -> LocationInput {
        let input = input.trim();
        match Self::parse_coordinates(input) {
            Ok(coordinate) => LocationInput::Coordinates(coordinate),
            Err(_) => LocationInput::Name(input.to_string()),
        }
    }

    /// Parse coordinates from string like "51.5074,-0.1278" or "51.5074 -0.1278"
    pub fn parse_coordinates(input: &str) -> Result<Coordinate> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return Err(HotelFinderError::validation(
                "Coordinates must be in format 'lat,lng'",
            ));
        }

        let lat = parts[0].parse::<f64>().map_err(|_| {
            HotelFinderError::validation(format!("Invalid latitude: {}", parts[0]))
        })?;
        let lng = parts[1].parse::<f64>().map_err(|_| {
            HotelFinderError::validation(format!("Invalid longitude: {}", parts[1]))
        })?;

        Coordinate::new(lat, lng)
    }
}

/// Default coordinate and jitter used when nothing else resolves a query
#[derive(Debug, Clone, Copy)]
pub struct FallbackLocation {
    pub coordinate: Coordinate,
    pub jitter_degrees: f64,
}

/// Service for resolving location inputs
pub struct Geocoder {
    provider: Option<Arc<dyn GeocodingProvider>>,
    fallback: FallbackLocation,
    random: Arc<RandomSource>,
}

impl Geocoder {
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn GeocodingProvider>>,
        fallback: FallbackLocation,
        random: Arc<RandomSource>,
    ) -> Self {
        Self {
            provider,
            fallback,
            random,
        }
    }

    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve free text into a location
    pub async fn resolve(&self, query: &str) -> Result<ResolvedLocation> {
        let query = query.trim();
        if query.is_empty() {
            return Err(HotelFinderError::location_unresolved(query));
        }

        debug!("Resolving location input: {:?}", query);

        let location = match LocationParser::parse(query) {
            LocationInput::Coordinates(coordinate) => self.reverse_resolve(coordinate).await?,
            LocationInput::Name(name) => self.resolve_name(&name).await,
        };

        debug!(
            "Resolved location: {} at ({}, {}) via {:?}",
            location.display_address,
            location.coordinate.lat,
            location.coordinate.lng,
            location.source
        );

        Ok(location)
    }

    /// Resolve a coordinate to a location with an address via reverse geocoding
    pub async fn reverse_resolve(&self, coordinate: Coordinate) -> Result<ResolvedLocation> {
        coordinate.validate()?;
        debug!("Reverse geocoding coordinates: ({}, {})", coordinate.lat, coordinate.lng);

        let Some(provider) = &self.provider else {
            debug!("No geocoding provider configured, using coordinates as name");
            return Ok(ResolvedLocation::from_coordinate(coordinate));
        };

        match provider.reverse_geocode(coordinate).await {
            Ok(results) => match results.into_iter().next() {
                Some(candidate) => {
                    // Keep the caller's exact point; the provider's may be snapped to an address
                    let mut location = ResolvedLocation::from(candidate);
                    location.coordinate = coordinate;
                    Ok(location)
                }
                None => {
                    debug!("No reverse geocoding results found, using coordinates as name");
                    Ok(ResolvedLocation::from_coordinate(coordinate))
                }
            },
            Err(e) => {
                warn!("Reverse geocoding failed: {}, using coordinates as name", e);
                Ok(ResolvedLocation::from_coordinate(coordinate))
            }
        }
    }

    async fn resolve_name(&self, name: &str) -> ResolvedLocation {
        match self.geocode_remote(name).await {
            Ok(location) => return location,
            Err(e) => warn!("Remote geocoding of '{}' failed: {}", name, e),
        }

        if let Some(location) = known_cities::lookup(name) {
            info!("Resolved '{}' from the known city table", name);
            return location;
        }

        let location = self.approximate(name);
        warn!(
            "Could not geocode '{}', using approximate location ({:.4}, {:.4})",
            name, location.coordinate.lat, location.coordinate.lng
        );
        location
    }

    async fn geocode_remote(&self, name: &str) -> Result<ResolvedLocation> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| HotelFinderError::config("No geocoding API key configured"))?;

        let candidate = provider
            .geocode(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HotelFinderError::not_found(format!("Location not found: {name}")))?;

        // Use the first (best) result
        debug!(
            "Found location: {} ({:.4}, {:.4})",
            candidate.display_address(),
            candidate.coordinate.lat,
            candidate.coordinate.lng
        );
        Ok(candidate.into())
    }

    /// Default coordinate nudged by a small random offset
    fn approximate(&self, name: &str) -> ResolvedLocation {
        let base = self.fallback.coordinate;
        let coordinate = Coordinate {
            lat: (base.lat + self.random.jitter(self.fallback.jitter_degrees)).clamp(-90.0, 90.0),
            lng: (base.lng + self.random.jitter(self.fallback.jitter_degrees))
                .clamp(-180.0, 180.0),
        };
        ResolvedLocation::new(coordinate, name.to_string(), LocationSource::Approximate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted provider recording the queries it receives
    struct FakeProvider {
        forward: Mutex<Option<Result<Vec<GeocodeCandidate>>>>,
        reverse: Mutex<Option<Result<Vec<GeocodeCandidate>>>>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn new(
            forward: Result<Vec<GeocodeCandidate>>,
            reverse: Result<Vec<GeocodeCandidate>>,
        ) -> Self {
            Self {
                forward: Mutex::new(Some(forward)),
                reverse: Mutex::new(Some(reverse)),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GeocodingProvider for FakeProvider {
        async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
            self.queries.lock().unwrap().push(query.to_string());
            self.forward
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<Vec<GeocodeCandidate>> {
            self.reverse
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn candidate(lat: f64, lng: f64) -> GeocodeCandidate {
        GeocodeCandidate {
            coordinate: Coordinate { lat, lng },
            formatted_address: Some("1 Example Rd, Springfield".to_string()),
            locality: Some("Springfield".to_string()),
            region: Some("Illinois".to_string()),
            country: Some("United States".to_string()),
        }
    }

    fn fallback() -> FallbackLocation {
        FallbackLocation {
            coordinate: Coordinate {
                lat: 40.7128,
                lng: -74.006,
            },
            jitter_degrees: 0.1,
        }
    }

    fn geocoder(provider: Option<Arc<dyn GeocodingProvider>>, seed: u64) -> Geocoder {
        Geocoder::new(provider, fallback(), Arc::new(RandomSource::seeded(seed)))
    }

    #[tokio::test]
    async fn test_remote_result_is_used() {
        let provider = Arc::new(FakeProvider::new(
            Ok(vec![candidate(39.78, -89.65), candidate(0.0, 0.0)]),
            Ok(Vec::new()),
        ));
        let geocoder = geocoder(Some(provider.clone()), 1);

        let location = geocoder.resolve("  Springfield ").await.unwrap();
        assert_eq!(location.coordinate, Coordinate { lat: 39.78, lng: -89.65 });
        assert_eq!(location.display_address, "Springfield, Illinois, United States");
        assert_eq!(location.country.as_deref(), Some("United States"));
        assert_eq!(location.source, LocationSource::Remote);
        assert_eq!(provider.queries.lock().unwrap().as_slice(), ["Springfield"]);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_known_city() {
        let provider = Arc::new(FakeProvider::new(
            Err(HotelFinderError::network("connection refused")),
            Ok(Vec::new()),
        ));
        let geocoder = geocoder(Some(provider), 1);

        let location = geocoder.resolve("London").await.unwrap();
        assert_eq!(location.coordinate, Coordinate { lat: 51.5074, lng: -0.1278 });
        assert_eq!(location.country.as_deref(), Some("United Kingdom"));
        assert_eq!(location.source, LocationSource::KnownCity);
    }

    #[tokio::test]
    async fn test_empty_remote_result_falls_back_to_known_city() {
        let provider = Arc::new(FakeProvider::new(Ok(Vec::new()), Ok(Vec::new())));
        let geocoder = geocoder(Some(provider), 1);

        let location = geocoder.resolve("tokyo").await.unwrap();
        assert_eq!(location.source, LocationSource::KnownCity);
        assert_eq!(location.country.as_deref(), Some("Japan"));
    }

    #[tokio::test]
    async fn test_known_city_without_provider() {
        let location = geocoder(None, 1).resolve("london").await.unwrap();
        assert_eq!(location.coordinate, Coordinate { lat: 51.5074, lng: -0.1278 });
        assert_eq!(location.country.as_deref(), Some("United Kingdom"));
    }

    #[tokio::test]
    async fn test_unknown_query_never_fails() {
        let provider = Arc::new(FakeProvider::new(
            Err(HotelFinderError::api("REQUEST_DENIED")),
            Ok(Vec::new()),
        ));
        let geocoder = geocoder(Some(provider), 5);

        let location = geocoder.resolve("Nowhere In Particular").await.unwrap();
        assert_eq!(location.source, LocationSource::Approximate);
        assert_eq!(location.display_address, "Nowhere In Particular");
        assert!(location.country.is_none());
        assert!((location.coordinate.lat - 40.7128).abs() <= 0.1);
        assert!((location.coordinate.lng + 74.006).abs() <= 0.1);
    }

    #[tokio::test]
    async fn test_unknown_queries_do_not_collide() {
        let geocoder = geocoder(None, 5);
        let first = geocoder.resolve("somewhere").await.unwrap();
        let second = geocoder.resolve("somewhere").await.unwrap();
        assert_ne!(first.coordinate, second.coordinate);
    }

    #[tokio::test]
    async fn test_jitter_is_deterministic_for_a_seed() {
        let a = geocoder(None, 77).resolve("somewhere").await.unwrap();
        let b = geocoder(None, 77).resolve("somewhere").await.unwrap();
        assert_eq!(a.coordinate, b.coordinate);
    }

    #[tokio::test]
    async fn test_blank_query_is_unresolved() {
        let err = geocoder(None, 1).resolve("   ").await.unwrap_err();
        assert!(matches!(err, HotelFinderError::LocationUnresolved { .. }));
    }

    #[tokio::test]
    async fn test_coordinate_input_is_reverse_geocoded() {
        let provider = Arc::new(FakeProvider::new(
            Ok(Vec::new()),
            Ok(vec![candidate(39.7817, -89.6501)]),
        ));
        let geocoder = geocoder(Some(provider.clone()), 1);

        let location = geocoder.resolve("39.78, -89.65").await.unwrap();
        assert_eq!(location.coordinate, Coordinate { lat: 39.78, lng: -89.65 });
        assert_eq!(location.display_address, "Springfield, Illinois, United States");
        assert!(provider.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reverse_failure_uses_coordinate_text() {
        let provider = Arc::new(FakeProvider::new(
            Ok(Vec::new()),
            Err(HotelFinderError::network("timed out")),
        ));
        let geocoder = geocoder(Some(provider), 1);

        let location = geocoder
            .reverse_resolve(Coordinate { lat: 46.8182, lng: 8.2275 })
            .await
            .unwrap();
        assert_eq!(location.display_address, "46.8182, 8.2275");
        assert_eq!(location.source, LocationSource::Coordinates);
    }

    #[tokio::test]
    async fn test_reverse_rejects_invalid_coordinate() {
        let err = geocoder(None, 1)
            .reverse_resolve(Coordinate { lat: 120.0, lng: 0.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, HotelFinderError::Validation { .. }));
    }

    #[test]
    fn test_display_address_fallbacks() {
        let mut c = candidate(1.0, 2.0);
        c.locality = None;
        c.region = None;
        assert_eq!(c.display_address(), "United States");

        c.country = None;
        assert_eq!(c.display_address(), "1 Example Rd, Springfield");

        c.formatted_address = None;
        assert_eq!(c.display_address(), "1.0000, 2.0000");
    }

    #[test]
    fn test_location_parser_coordinates() {
        assert_eq!(
            LocationParser::parse("46.8182,8.2275"),
            LocationInput::Coordinates(Coordinate { lat: 46.8182, lng: 8.2275 })
        );
        assert_eq!(
            LocationParser::parse("-46.8182  -8.2275"),
            LocationInput::Coordinates(Coordinate { lat: -46.8182, lng: -8.2275 })
        );
    }

    #[test]
    fn test_location_parser_names() {
        assert!(matches!(LocationParser::parse("91.0,8.0"), LocationInput::Name(_)));
        assert!(matches!(LocationParser::parse("46.0"), LocationInput::Name(_)));
        assert!(matches!(LocationParser::parse("46.0,8.0,1.0"), LocationInput::Name(_)));
        assert_eq!(
            LocationParser::parse(" New York City "),
            LocationInput::Name("New York City".to_string())
        );
    }
}
