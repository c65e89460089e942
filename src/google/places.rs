//! Google Places nearby search / details responses and the [`PlacesProvider`]
//! implementation

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use super::geocoding::LatLng;
use super::{GoogleClient, HasStatus};
use crate::hotels::remote::{PlaceDetails, PlaceReview, PlaceStub, PlacesProvider};
use crate::models::Coordinate;
use crate::{HotelFinderError, Result};

/// Fields requested from the details endpoint
const DETAIL_FIELDS: &str = "name,rating,formatted_address,formatted_phone_number,website,photos,price_level,reviews,types,opening_hours";

/// Width requested for hotel photos
const PHOTO_MAX_WIDTH: u32 = 400;

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyPlace {
    pub place_id: String,
    pub name: String,
    pub vicinity: Option<String>,
    pub geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
pub struct PlaceGeometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    pub result: Option<DetailsResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailsResult {
    pub name: Option<String>,
    pub rating: Option<f32>,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub reviews: Vec<GoogleReview>,
    #[serde(default)]
    pub types: Vec<String>,
    pub opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Deserialize)]
pub struct Photo {
    pub photo_reference: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleReview {
    pub author_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rating: f32,
}

#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

impl HasStatus for NearbySearchResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl HasStatus for DetailsResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl From<NearbyPlace> for PlaceStub {
    fn from(place: NearbyPlace) -> Self {
        Self {
            id: place.place_id,
            name: place.name,
            vicinity: place.vicinity,
            coordinate: place.geometry.location.into(),
        }
    }
}

impl From<DetailsResult> for PlaceDetails {
    fn from(result: DetailsResult) -> Self {
        Self {
            name: result.name,
            rating: result.rating,
            address: result.formatted_address,
            phone: result.formatted_phone_number,
            website: result.website,
            photo_references: result
                .photos
                .into_iter()
                .map(|photo| photo.photo_reference)
                .collect(),
            price_level: result.price_level,
            reviews: result
                .reviews
                .into_iter()
                .map(|review| PlaceReview {
                    author: review.author_name,
                    text: review.text,
                    rating: review.rating,
                })
                .collect(),
            types: result.types,
            opening_hours: result
                .opening_hours
                .map(|hours| hours.weekday_text)
                .unwrap_or_default(),
        }
    }
}

impl GoogleClient {
    fn nearby_search_url(&self, center: Coordinate, radius_meters: u32, category: &str) -> String {
        format!(
            "{}/nearbysearch/json?location={},{}&radius={}&type={}&{}",
            self.places_url,
            center.lat,
            center.lng,
            radius_meters,
            urlencoding::encode(category),
            self.key_param()
        )
    }

    fn details_url(&self, place_id: &str) -> String {
        format!(
            "{}/details/json?place_id={}&fields={}&{}",
            self.places_url,
            urlencoding::encode(place_id),
            DETAIL_FIELDS,
            self.key_param()
        )
    }
}

#[async_trait]
impl PlacesProvider for GoogleClient {
    #[instrument(skip(self))]
    async fn nearby(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PlaceStub>> {
        let response: NearbySearchResponse = self
            .get_json(&self.nearby_search_url(center, radius_meters, category))
            .await?;
        info!("Nearby search returned {} place(s)", response.results.len());
        Ok(response.results.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn details(&self, place_id: &str) -> Result<PlaceDetails> {
        let response: DetailsResponse = self.get_json(&self.details_url(place_id)).await?;
        response
            .result
            .map(Into::into)
            .ok_or_else(|| HotelFinderError::not_found(format!("No details for place {place_id}")))
    }

    fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&{}",
            self.places_url,
            PHOTO_MAX_WIDTH,
            urlencoding::encode(photo_reference),
            self.key_param()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HotelFinderConfig;

    const NEARBY_RESPONSE: &str = r#"{
        "html_attributions": [],
        "results": [{
            "place_id": "abc123",
            "name": "The Savoy",
            "vicinity": "Strand, London",
            "geometry": {"location": {"lat": 51.5104, "lng": -0.1205}},
            "types": ["lodging", "point_of_interest", "establishment"]
        }],
        "status": "OK"
    }"#;

    const DETAILS_RESPONSE: &str = r#"{
        "result": {
            "name": "The Savoy",
            "rating": 4.7,
            "formatted_address": "Strand, London WC2R 0EZ, UK",
            "formatted_phone_number": "020 7836 4343",
            "website": "https://www.thesavoylondon.com/",
            "photos": [{"photo_reference": "photo-1", "height": 800, "width": 1200}],
            "price_level": 4,
            "reviews": [
                {"author_name": "Alice", "text": "Wonderful stay", "rating": 5},
                {"author_name": "Bob", "rating": 4}
            ],
            "types": ["lodging", "restaurant", "bar"],
            "opening_hours": {"weekday_text": ["Monday: Open 24 hours"]}
        },
        "status": "OK"
    }"#;

    fn client() -> GoogleClient {
        let mut config = HotelFinderConfig::default();
        config.google.api_key = Some("test_api_key_123".to_string());
        GoogleClient::new(&config).unwrap()
    }

    #[test]
    fn test_parse_nearby_response() {
        let response: NearbySearchResponse = serde_json::from_str(NEARBY_RESPONSE).unwrap();
        let stub: PlaceStub = response.results.into_iter().next().unwrap().into();
        assert_eq!(stub.id, "abc123");
        assert_eq!(stub.name, "The Savoy");
        assert_eq!(stub.vicinity.as_deref(), Some("Strand, London"));
        assert_eq!(stub.coordinate.lat, 51.5104);
    }

    #[test]
    fn test_parse_details_response() {
        let response: DetailsResponse = serde_json::from_str(DETAILS_RESPONSE).unwrap();
        let details: PlaceDetails = response.result.unwrap().into();
        assert_eq!(details.name.as_deref(), Some("The Savoy"));
        assert_eq!(details.rating, Some(4.7));
        assert_eq!(details.price_level, Some(4));
        assert_eq!(details.photo_references, vec!["photo-1".to_string()]);
        assert_eq!(details.reviews.len(), 2);
        assert_eq!(details.reviews[1].text, "");
        assert_eq!(details.opening_hours, vec!["Monday: Open 24 hours".to_string()]);
    }

    #[test]
    fn test_parse_sparse_details() {
        let response: DetailsResponse =
            serde_json::from_str(r#"{"result": {}, "status": "OK"}"#).unwrap();
        let details: PlaceDetails = response.result.unwrap().into();
        assert!(details.name.is_none());
        assert!(details.photo_references.is_empty());
        assert!(details.opening_hours.is_empty());
    }

    #[test]
    fn test_urls() {
        let client = client();
        let center = Coordinate {
            lat: 51.5,
            lng: -0.12,
        };
        assert_eq!(
            client.nearby_search_url(center, 5000, "lodging"),
            "https://maps.googleapis.com/maps/api/place/nearbysearch/json?location=51.5,-0.12&radius=5000&type=lodging&key=test_api_key_123"
        );
        assert!(client.details_url("abc123").contains("place_id=abc123&fields=name,rating"));
        assert_eq!(
            client.photo_url("photo-1"),
            "https://maps.googleapis.com/maps/api/place/photo?maxwidth=400&photoreference=photo-1&key=test_api_key_123"
        );
    }
}
