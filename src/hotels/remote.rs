//! Places-backed hotel aggregation

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::HotelAggregator;
use crate::Result;
use crate::distance::{distance_km, sort_by_distance};
use crate::models::{Coordinate, HotelRecord, ResolvedLocation, Review};
use crate::presentation::{price_band_text, select_image_url};

/// Reviews kept per hotel
const MAX_REVIEWS: usize = 3;

/// A place returned by a nearby search, before details are fetched
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceStub {
    pub id: String,
    pub name: String,
    pub vicinity: Option<String>,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub rating: Option<f32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub photo_references: Vec<String>,
    pub price_level: Option<u8>,
    pub reviews: Vec<PlaceReview>,
    pub types: Vec<String>,
    pub opening_hours: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceReview {
    pub author: String,
    pub text: String,
    pub rating: f32,
}

/// A places service able to search around a point and describe a place
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn nearby(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PlaceStub>>;

    async fn details(&self, place_id: &str) -> Result<PlaceDetails>;

    /// Fetchable image URL for a photo reference
    fn photo_url(&self, photo_reference: &str) -> String;
}

/// Place types worth showing as amenities
fn amenity_for_type(place_type: &str) -> Option<&'static str> {
    match place_type {
        "restaurant" | "food" => Some("Restaurant"),
        "bar" | "night_club" => Some("Bar"),
        "cafe" => Some("Cafe"),
        "spa" | "beauty_salon" => Some("Spa"),
        "gym" => Some("Fitness Center"),
        "parking" => Some("Parking"),
        "casino" => Some("Casino"),
        "meal_delivery" | "meal_takeaway" => Some("Room Service"),
        _ => None,
    }
}

/// Hotels from a [`PlacesProvider`]: one nearby search, then details for each
/// candidate fetched concurrently
pub struct RemoteAggregator {
    provider: Arc<dyn PlacesProvider>,
    category: String,
    max_candidates: usize,
}

impl RemoteAggregator {
    #[must_use]
    pub fn new(provider: Arc<dyn PlacesProvider>, category: String, max_candidates: usize) -> Self {
        Self {
            provider,
            category,
            max_candidates,
        }
    }

    fn build_record(&self, origin: Coordinate, stub: PlaceStub, details: PlaceDetails) -> HotelRecord {
        let price_level = details.price_level.map(|level| level.min(4));
        let image_url = select_image_url(
            details
                .photo_references
                .first()
                .map(|reference| self.provider.photo_url(reference)),
        );
        let address = details
            .address
            .or(stub.vicinity)
            .filter(|address| !address.trim().is_empty())
            .unwrap_or_else(|| "Address not available".to_string());

        HotelRecord {
            name: details.name.unwrap_or(stub.name),
            rating: details.rating.unwrap_or(0.0).clamp(0.0, 5.0),
            address,
            distance_km: distance_km(origin, stub.coordinate),
            price_range_text: price_band_text(price_level).to_string(),
            price_level,
            image_url,
            coordinate: stub.coordinate,
            phone: details.phone,
            website: details.website,
            amenities: details
                .types
                .iter()
                .filter_map(|place_type| amenity_for_type(place_type))
                .map(str::to_string)
                .collect::<BTreeSet<_>>(),
            reviews: details
                .reviews
                .into_iter()
                .take(MAX_REVIEWS)
                .map(|review| Review::new(review.author, review.text, review.rating))
                .collect(),
            opening_hours: details.opening_hours,
            id: stub.id,
        }
    }
}

#[async_trait]
impl HotelAggregator for RemoteAggregator {
    #[instrument(skip(self, location), fields(location = %location.display_address))]
    async fn find_hotels(
        &self,
        location: &ResolvedLocation,
        radius_meters: u32,
    ) -> Result<Vec<HotelRecord>> {
        let origin = location.coordinate;
        let stubs = self
            .provider
            .nearby(origin, radius_meters, &self.category)
            .await?;
        debug!(
            "Nearby search found {} candidate(s), enriching at most {}",
            stubs.len(),
            self.max_candidates
        );

        let lookups = stubs
            .into_iter()
            .take(self.max_candidates)
            .map(|stub| async move {
                let details = self.provider.details(&stub.id).await;
                (stub, details)
            });

        let mut hotels: Vec<HotelRecord> = join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(stub, details)| match details {
                Ok(details) => Some(self.build_record(origin, stub, details)),
                Err(e) => {
                    warn!("Dropping '{}': details lookup failed: {}", stub.name, e);
                    None
                }
            })
            .collect();

        // Lookups complete in any order
        sort_by_distance(&mut hotels);
        info!("Built {} hotel record(s) from places data", hotels.len());
        Ok(hotels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HotelFinderError;
    use crate::models::LocationSource;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    struct FakePlaces {
        stubs: Vec<PlaceStub>,
        details: HashMap<String, PlaceDetails>,
        /// Details for these ids resolve slowly
        slow: Vec<String>,
        detail_calls: Mutex<Vec<String>>,
        fail_search: bool,
    }

    impl FakePlaces {
        fn new(stubs: Vec<PlaceStub>) -> Self {
            Self {
                stubs,
                details: HashMap::new(),
                slow: Vec::new(),
                detail_calls: Mutex::new(Vec::new()),
                fail_search: false,
            }
        }
    }

    #[async_trait]
    impl PlacesProvider for FakePlaces {
        async fn nearby(
            &self,
            _center: Coordinate,
            _radius_meters: u32,
            category: &str,
        ) -> Result<Vec<PlaceStub>> {
            assert_eq!(category, "lodging");
            if self.fail_search {
                return Err(HotelFinderError::network("timed out"));
            }
            Ok(self.stubs.clone())
        }

        async fn details(&self, place_id: &str) -> Result<PlaceDetails> {
            self.detail_calls.lock().unwrap().push(place_id.to_string());
            if self.slow.iter().any(|id| id == place_id) {
                tokio::time::sleep(Duration::from_millis(30)).await;
            }
            self.details
                .get(place_id)
                .cloned()
                .ok_or_else(|| HotelFinderError::not_found(place_id.to_string()))
        }

        fn photo_url(&self, photo_reference: &str) -> String {
            format!("https://photos.test/{photo_reference}")
        }
    }

    fn origin() -> ResolvedLocation {
        ResolvedLocation::new(
            Coordinate { lat: 0.0, lng: 0.0 },
            "Null Island".to_string(),
            LocationSource::Remote,
        )
    }

    fn stub(id: &str, lng: f64) -> PlaceStub {
        PlaceStub {
            id: id.to_string(),
            name: format!("Stub {id}"),
            vicinity: Some(format!("{id} Vicinity Rd")),
            coordinate: Coordinate { lat: 0.0, lng },
        }
    }

    fn details(name: &str) -> PlaceDetails {
        PlaceDetails {
            name: Some(name.to_string()),
            rating: Some(4.2),
            price_level: Some(2),
            ..PlaceDetails::default()
        }
    }

    fn aggregator(places: FakePlaces, max_candidates: usize) -> RemoteAggregator {
        RemoteAggregator::new(Arc::new(places), "lodging".to_string(), max_candidates)
    }

    #[tokio::test]
    async fn test_results_sorted_by_distance_despite_completion_order() {
        let mut places = FakePlaces::new(vec![stub("far", 0.03), stub("near", 0.01)]);
        places.details.insert("far".to_string(), details("Far Hotel"));
        places.details.insert("near".to_string(), details("Near Hotel"));
        places.slow.push("near".to_string());

        let hotels = aggregator(places, 20).find_hotels(&origin(), 5000).await.unwrap();
        let names: Vec<&str> = hotels.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Near Hotel", "Far Hotel"]);
        assert!((hotels[0].distance_km - 1.11).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_failed_details_are_dropped() {
        let mut places = FakePlaces::new(vec![stub("ok", 0.01), stub("broken", 0.02)]);
        places.details.insert("ok".to_string(), details("Fine Hotel"));

        let hotels = aggregator(places, 20).find_hotels(&origin(), 5000).await.unwrap();
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].id, "ok");
    }

    #[tokio::test]
    async fn test_candidates_are_capped() {
        let stubs: Vec<PlaceStub> = (0..5).map(|i| stub(&i.to_string(), 0.01 * f64::from(i))).collect();
        let places = Arc::new(FakePlaces::new(stubs));
        let aggregator = RemoteAggregator::new(places.clone(), "lodging".to_string(), 3);

        let hotels = aggregator.find_hotels(&origin(), 5000).await.unwrap();
        assert!(hotels.is_empty());
        assert_eq!(places.detail_calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let mut places = FakePlaces::new(Vec::new());
        places.fail_search = true;
        let err = aggregator(places, 20).find_hotels(&origin(), 5000).await.unwrap_err();
        assert!(matches!(err, HotelFinderError::Network { .. }));
    }

    #[test]
    fn test_record_mapping() {
        let places = FakePlaces::new(Vec::new());
        let aggregator = aggregator(places, 20);
        let full = PlaceDetails {
            name: Some("The Savoy".to_string()),
            rating: Some(4.7),
            address: Some("Strand, London".to_string()),
            phone: Some("020 7836 4343".to_string()),
            website: None,
            photo_references: vec!["p1".to_string(), "p2".to_string()],
            price_level: Some(4),
            reviews: (0..5)
                .map(|i| PlaceReview {
                    author: format!("Guest {i}"),
                    text: "Lovely".to_string(),
                    rating: 5.0,
                })
                .collect(),
            types: vec!["lodging".to_string(), "restaurant".to_string(), "spa".to_string()],
            opening_hours: vec!["Monday: Open 24 hours".to_string()],
        };

        let record = aggregator.build_record(Coordinate { lat: 0.0, lng: 0.0 }, stub("s", 0.01), full);
        assert_eq!(record.id, "s");
        assert_eq!(record.name, "The Savoy");
        assert_eq!(record.price_range_text, "$400+");
        assert_eq!(record.image_url, "https://photos.test/p1");
        assert_eq!(record.reviews.len(), 3);
        assert_eq!(
            record.amenities.iter().map(String::as_str).collect::<Vec<_>>(),
            ["Restaurant", "Spa"]
        );
        assert_eq!(record.opening_hours.len(), 1);
    }

    #[test]
    fn test_sparse_details_use_defaults() {
        let aggregator = aggregator(FakePlaces::new(Vec::new()), 20);
        let record = aggregator.build_record(
            Coordinate { lat: 0.0, lng: 0.0 },
            stub("s", 0.01),
            PlaceDetails::default(),
        );
        assert_eq!(record.name, "Stub s");
        assert_eq!(record.address, "s Vicinity Rd");
        assert_eq!(record.price_range_text, "$50-100");
        assert!(record.price_level.is_none());
        assert_eq!(record.image_url, "/placeholder.svg");
        assert_eq!(record.rating, 0.0);
    }
}
