//! LocationIQ driving directions client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{Route, RoutingProvider};
use crate::config::HotelFinderConfig;
use crate::models::Coordinate;
use crate::{HotelFinderError, Result};

#[derive(Clone)]
pub struct LocationIqClient {
    client: Client,
    api_key: String,
    directions_url: String,
}

impl std::fmt::Debug for LocationIqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationIqClient")
            .field("directions_url", &self.directions_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub code: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteSummary>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RouteSummary {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

impl From<&RouteSummary> for Route {
    fn from(summary: &RouteSummary) -> Self {
        Route {
            distance_km: (summary.distance / 100.0).round() / 10.0,
            duration_minutes: (summary.duration / 60.0).round().max(0.0) as u32,
        }
    }
}

impl LocationIqClient {
    /// Build a client from configuration; fails when no routing key is configured
    pub fn new(config: &HotelFinderConfig) -> Result<Self> {
        let api_key = config
            .routing_api_key()
            .ok_or_else(|| HotelFinderError::config("Routing API key not found"))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds.into()))
            .user_agent(config.http.user_agent.clone())
            .build()
            .map_err(|e| HotelFinderError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            directions_url: config.routing.directions_url.trim_end_matches('/').to_string(),
        })
    }

    /// Coordinates go lng,lat as in OSRM-style services
    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/{},{};{},{}?key={}&overview=false",
            self.directions_url,
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl RoutingProvider for LocationIqClient {
    #[instrument(skip(self))]
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route> {
        let start_time = Instant::now();
        let response = self
            .client
            .get(self.route_url(origin, destination))
            .send()
            .await?;
        let status = response.status();

        debug!(
            "Routing response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            warn!("Routing request failed with status {}", status);
            return Err(match status.as_u16() {
                401 | 403 => HotelFinderError::config(format!(
                    "Routing service rejected the credentials (HTTP {status})"
                )),
                404 => HotelFinderError::not_found("No route between the given points"),
                _ => HotelFinderError::network(format!(
                    "Routing request failed with status: {status}"
                )),
            });
        }

        let body: DirectionsResponse = response.json().await?;
        route_from_response(&body)
    }
}

fn route_from_response(body: &DirectionsResponse) -> Result<Route> {
    if let Some(code) = body.code.as_deref().filter(|code| *code != "Ok") {
        let detail = body.error.as_deref().unwrap_or("no details");
        return Err(match code {
            "NoRoute" => HotelFinderError::not_found(detail.to_string()),
            other => HotelFinderError::api(format!("Routing status {other}: {detail}")),
        });
    }

    body.routes
        .first()
        .map(Route::from)
        .ok_or_else(|| HotelFinderError::not_found("Routing service returned no routes"))
}
