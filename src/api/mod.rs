use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::HotelFinderError;
use crate::config::AggregatorMode;
use crate::finder::{DistanceKind, HotelFinder, SearchResults};
use crate::hotels::HotelSource;
use crate::models::{Coordinate, ResolvedLocation};
use crate::presentation::{DirectionsProvider, HotelView};

#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<HotelFinder>,
    pub has_google_key: bool,
    pub has_routing_key: bool,
}

impl AppState {
    #[must_use]
    pub fn new(finder: Arc<HotelFinder>, has_google_key: bool) -> Self {
        let has_routing_key = finder.has_routing();
        Self {
            finder,
            has_google_key,
            has_routing_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub location: String,
    /// Meters; missing or zero means the configured default
    pub radius: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub location: ResolvedLocation,
    pub radius_meters: u32,
    pub source: HotelSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub searched_at: DateTime<Utc>,
    pub hotels: Vec<HotelView>,
}

impl SearchResponse {
    /// Results with every hotel rendered as a card carrying a directions link
    #[must_use]
    pub fn from_results(results: SearchResults, provider: DirectionsProvider) -> Self {
        let hotels = results.views(provider);
        Self {
            query: results.query,
            location: results.location,
            radius_meters: results.radius_meters,
            source: results.source,
            notice: results.notice,
            searched_at: results.searched_at,
            hotels,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub hotel_name: Option<String>,
    pub provider: Option<DirectionsProvider>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsResponse {
    pub directions_url: String,
    pub route_info: RouteInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub distance_km: f64,
    pub distance_text: String,
    /// Driving time, only known when a routing service answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub distance_kind: DistanceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub status: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub has_google_key: bool,
    pub has_routing_key: bool,
    pub mode: AggregatorMode,
    pub environment: &'static str,
}

/// Library errors rendered as `{ "error": ... }` with a matching status code
#[derive(Debug)]
pub struct ApiError(HotelFinderError);

impl From<HotelFinderError> for ApiError {
    fn from(err: HotelFinderError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(HotelFinderError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(HotelFinderError::validation(rejection.body_text()))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            HotelFinderError::LocationUnresolved { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            HotelFinderError::Validation { .. } => StatusCode::BAD_REQUEST,
            HotelFinderError::NotFound { .. } => StatusCode::NOT_FOUND,
            HotelFinderError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HotelFinderError::Network { .. } | HotelFinderError::Api { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search-hotels", post(search_hotels))
        .route("/get-directions", post(get_directions))
        .route("/reverse-geocode", get(reverse_geocode))
        .route("/test-connection", get(test_connection))
        .with_state(state)
}

async fn search_hotels(
    State(state): State<AppState>,
    request: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = request?;
    let results = state.finder.search(&request.location, request.radius).await?;
    Ok(Json(SearchResponse::from_results(
        results,
        state.finder.directions_provider(),
    )))
}

async fn get_directions(
    State(state): State<AppState>,
    request: Result<Json<DirectionsRequest>, JsonRejection>,
) -> Result<Json<DirectionsResponse>, ApiError> {
    let Json(request) = request?;
    let directions = state
        .finder
        .directions(request.origin, request.destination, request.provider)
        .await?;

    Ok(Json(DirectionsResponse {
        directions_url: directions.directions_url,
        route_info: RouteInfo {
            distance_km: directions.distance_km,
            distance_text: directions.distance_text,
            duration_minutes: directions.duration_minutes,
            distance_kind: directions.distance_kind,
            hotel_name: request.hotel_name,
        },
    }))
}

async fn reverse_geocode(
    State(state): State<AppState>,
    query: Result<Query<ReverseGeocodeQuery>, QueryRejection>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    let Query(query) = query?;
    let location = state
        .finder
        .reverse_geocode(Coordinate {
            lat: query.lat,
            lng: query.lng,
        })
        .await?;
    Ok(Json(location))
}

async fn test_connection(State(state): State<AppState>) -> Json<ConnectionStatus> {
    let message = if state.has_google_key {
        "HotelFinder API is running with Google Places access"
    } else {
        "HotelFinder API is running without a Google API key; sample hotels will be served"
    };

    Json(ConnectionStatus {
        status: "ok",
        message: message.to_string(),
        timestamp: Utc::now(),
        has_google_key: state.has_google_key,
        has_routing_key: state.has_routing_key,
        mode: state.finder.mode(),
        environment: if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(HotelFinderError::location_unresolved(""), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(HotelFinderError::validation("bad latitude"), StatusCode::BAD_REQUEST)]
    #[case(HotelFinderError::config("no key"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(HotelFinderError::network("timeout"), StatusCode::BAD_GATEWAY)]
    #[case(HotelFinderError::api("OVER_QUERY_LIMIT"), StatusCode::BAD_GATEWAY)]
    fn test_error_status(#[case] err: HotelFinderError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(err).status(), expected);
    }

    #[test]
    fn test_search_request_radius_is_optional() {
        let request: SearchRequest = serde_json::from_str(r#"{"location": "Paris"}"#).unwrap();
        assert_eq!(request.location, "Paris");
        assert!(request.radius.is_none());
    }

    #[test]
    fn test_directions_request_accepts_provider_alias() {
        let request: DirectionsRequest = serde_json::from_str(
            r#"{"origin": {"lat": 1.0, "lng": 2.0}, "destination": {"lat": 3.0, "lng": 4.0},
                "hotelName": "Grand Plaza Hotel", "provider": "osm"}"#,
        )
        .unwrap();
        assert_eq!(request.hotel_name.as_deref(), Some("Grand Plaza Hotel"));
        assert_eq!(request.provider, Some(DirectionsProvider::OpenStreetMap));
    }
}
