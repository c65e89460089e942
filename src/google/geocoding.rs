//! Google Geocoding API responses and the [`GeocodingProvider`] implementation

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{GoogleClient, HasStatus};
use crate::Result;
use crate::geocoding::{GeocodeCandidate, GeocodingProvider};
use crate::models::Coordinate;

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Coordinate {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl HasStatus for GeocodeResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl GeocodeResult {
    fn component(&self, kinds: &[&str]) -> Option<String> {
        kinds.iter().find_map(|kind| {
            self.address_components
                .iter()
                .find(|component| component.types.iter().any(|t| t == kind))
                .map(|component| component.long_name.clone())
        })
    }
}

impl From<GeocodeResult> for GeocodeCandidate {
    fn from(result: GeocodeResult) -> Self {
        Self {
            coordinate: result.geometry.location.into(),
            locality: result.component(&["locality", "postal_town", "sublocality"]),
            region: result.component(&["administrative_area_level_1"]),
            country: result.component(&["country"]),
            formatted_address: result.formatted_address,
        }
    }
}

impl GoogleClient {
    fn geocode_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}?address={}&{}",
            self.geocoding_url,
            urlencoding::encode(query),
            self.key_param()
        );
        if let Some(region) = &self.region {
            url.push_str(&format!("&components=country:{}", urlencoding::encode(region)));
        }
        url
    }

    fn reverse_geocode_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}?latlng={},{}&{}",
            self.geocoding_url,
            coordinate.lat,
            coordinate.lng,
            self.key_param()
        )
    }
}

#[async_trait]
impl GeocodingProvider for GoogleClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let response: GeocodeResponse = self.get_json(&self.geocode_url(query)).await?;
        info!(
            "Geocoding '{}' returned {} result(s)",
            query,
            response.results.len()
        );
        Ok(response.results.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Vec<GeocodeCandidate>> {
        let response: GeocodeResponse = self
            .get_json(&self.reverse_geocode_url(coordinate))
            .await?;
        Ok(response.results.into_iter().map(Into::into).collect())
    }
}
