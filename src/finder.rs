//! Search orchestration: geocode, aggregate, rank

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::config::{AggregatorMode, HotelFinderConfig};
use crate::distance::{distance_km, sort_by_distance};
use crate::geocoding::{FallbackLocation, Geocoder, GeocodingProvider};
use crate::google::GoogleClient;
use crate::hotels::{
    HotelAggregator, HotelSearch, HotelSource, PlacesProvider, RemoteAggregator,
    SyntheticAggregator,
};
use crate::models::{Coordinate, HotelRecord, ResolvedLocation};
use crate::presentation::{DirectionsProvider, HotelView, format_distance};
use crate::random::RandomSource;
use crate::routing::{LocationIqClient, RoutingProvider};
use crate::session::SearchSession;

/// One completed search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub location: ResolvedLocation,
    pub radius_meters: u32,
    pub source: HotelSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub searched_at: DateTime<Utc>,
    /// Closest first
    pub hotels: Vec<HotelRecord>,
}

impl SearchResults {
    /// Display-ready cards with directions from the search point
    #[must_use]
    pub fn views(&self, provider: DirectionsProvider) -> Vec<HotelView> {
        self.hotels
            .iter()
            .cloned()
            .map(|hotel| HotelView::new(hotel, Some(self.location.coordinate), provider))
            .collect()
    }
}

/// How a directions distance was measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceKind {
    Road,
    StraightLine,
}

/// Directions link plus the distance it covers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Directions {
    pub directions_url: String,
    pub distance_km: f64,
    pub distance_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub distance_kind: DistanceKind,
}

/// Radius bounds applied to incoming searches
#[derive(Debug, Clone, Copy)]
pub struct RadiusLimits {
    pub default_meters: u32,
    pub max_meters: u32,
}

impl RadiusLimits {
    /// Missing or zero radius means the default; larger than the maximum is clamped
    #[must_use]
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        match requested {
            None | Some(0) => self.default_meters,
            Some(radius) if radius > self.max_meters => {
                debug!("Clamping radius {} m to {} m", radius, self.max_meters);
                self.max_meters
            }
            Some(radius) => radius,
        }
    }
}

pub struct HotelFinder {
    geocoder: Geocoder,
    hotels: HotelSearch,
    radius: RadiusLimits,
    directions_provider: DirectionsProvider,
    routing: Option<Arc<dyn RoutingProvider>>,
}

impl HotelFinder {
    #[must_use]
    pub fn new(
        geocoder: Geocoder,
        hotels: HotelSearch,
        radius: RadiusLimits,
        directions_provider: DirectionsProvider,
    ) -> Self {
        Self {
            geocoder,
            hotels,
            radius,
            directions_provider,
            routing: None,
        }
    }

    /// Use `routing` for road distance and driving time in directions
    #[must_use]
    pub fn with_routing(mut self, routing: Arc<dyn RoutingProvider>) -> Self {
        self.routing = Some(routing);
        self
    }

    /// Wire up the Google client (when a key is present), the fallbacks and the
    /// shared random source from configuration
    pub fn from_config(config: &HotelFinderConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let random = Arc::new(RandomSource::new(config.search.random_seed));
        let google = match GoogleClient::new(config) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("Google services unavailable: {}", e);
                None
            }
        };

        let geocoding: Option<Arc<dyn GeocodingProvider>> = google
            .clone()
            .map(|client| client as Arc<dyn GeocodingProvider>);
        let geocoder = Geocoder::new(
            geocoding,
            FallbackLocation {
                coordinate: Coordinate {
                    lat: config.fallback.default_latitude,
                    lng: config.fallback.default_longitude,
                },
                jitter_degrees: config.fallback.jitter_degrees,
            },
            random.clone(),
        );

        let remote = match config.search.mode {
            AggregatorMode::Remote => google.map(|client| {
                Box::new(RemoteAggregator::new(
                    client as Arc<dyn PlacesProvider>,
                    config.search.category.clone(),
                    config.search.max_candidates,
                )) as Box<dyn HotelAggregator>
            }),
            AggregatorMode::Synthetic => None,
        };
        let hotels = HotelSearch::new(
            config.search.mode,
            remote,
            SyntheticAggregator::new(config.search.roster_size, random),
        );

        let routing = match LocationIqClient::new(config) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn RoutingProvider>),
            Err(e) => {
                debug!("Road routing unavailable: {}", e);
                None
            }
        };

        info!(
            "Hotel finder ready: mode={}, remote geocoding={}, road routing={}",
            config.search.mode,
            geocoder.has_remote(),
            routing.is_some()
        );

        let finder = Self::new(
            geocoder,
            hotels,
            RadiusLimits {
                default_meters: config.search.default_radius_meters,
                max_meters: config.search.max_radius_meters,
            },
            config.presentation.directions_provider,
        );
        Ok(match routing {
            Some(routing) => finder.with_routing(routing),
            None => finder,
        })
    }

    #[must_use]
    pub fn mode(&self) -> AggregatorMode {
        self.hotels.mode()
    }

    #[must_use]
    pub fn has_routing(&self) -> bool {
        self.routing.is_some()
    }

    #[must_use]
    pub fn directions_provider(&self) -> DirectionsProvider {
        self.directions_provider
    }

    /// Resolve `query` and collect hotels around it, closest first.
    ///
    /// Only blank input fails; every provider failure degrades to a fallback
    /// that is reported through [`SearchResults::source`] and
    /// [`SearchResults::notice`].
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, radius_meters: Option<u32>) -> Result<SearchResults> {
        let radius_meters = self.radius.resolve(radius_meters);
        let location = self.geocoder.resolve(query).await?;

        let outcome = self.hotels.find_hotels(&location, radius_meters).await;
        let mut hotels = outcome.hotels;
        sort_by_distance(&mut hotels);

        info!(
            "Search '{}' -> {} hotel(s) near {} ({:?})",
            query.trim(),
            hotels.len(),
            location.display_address,
            outcome.source
        );

        Ok(SearchResults {
            query: query.trim().to_string(),
            location,
            radius_meters,
            source: outcome.source,
            notice: outcome.notice,
            searched_at: Utc::now(),
            hotels,
        })
    }

    /// Run a search against a shared session.
    ///
    /// The lock is only held to move the session between states, never across
    /// the lookups. Results of a search superseded while running are returned
    /// to the caller but not published to the session.
    pub async fn search_in_session(
        &self,
        session: &Mutex<SearchSession>,
        query: &str,
        radius_meters: Option<u32>,
    ) -> Result<SearchResults> {
        let ticket = session.lock().await.begin(query.trim());

        match self.search(query, radius_meters).await {
            Ok(results) => {
                session.lock().await.complete(ticket, results.clone());
                Ok(results)
            }
            Err(e) => {
                session.lock().await.fail(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Describe a coordinate
    pub async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<ResolvedLocation> {
        self.geocoder.reverse_resolve(coordinate).await
    }

    /// Directions link between two points; `provider` overrides the configured one.
    ///
    /// Road distance and driving time come from the routing service when one
    /// is configured and answers; otherwise the straight-line distance is used.
    pub async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        provider: Option<DirectionsProvider>,
    ) -> Result<Directions> {
        origin.validate()?;
        destination.validate()?;

        let route = match &self.routing {
            Some(routing) => match routing.route(origin, destination).await {
                Ok(route) => Some(route),
                Err(e) => {
                    warn!("Routing failed: {}, using straight-line distance", e);
                    None
                }
            },
            None => None,
        };

        let (distance_km, duration_minutes, distance_kind) = match route {
            Some(route) => (
                route.distance_km,
                Some(route.duration_minutes),
                DistanceKind::Road,
            ),
            None => (
                distance_km(origin, destination),
                None,
                DistanceKind::StraightLine,
            ),
        };

        Ok(Directions {
            directions_url: provider
                .unwrap_or(self.directions_provider)
                .directions_url(origin, destination),
            distance_km,
            distance_text: format_distance(distance_km),
            duration_minutes,
            distance_kind,
        })
    }
}
