//! Generated sample hotels used in demo mode and whenever the places service
//! cannot answer

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::HotelAggregator;
use crate::Result;
use crate::distance::{destination_point, distance_km};
use crate::models::{HotelRecord, ResolvedLocation, Review};
use crate::presentation::{PLACEHOLDER_IMAGE, format_price_band};
use crate::random::RandomSource;

/// Hotel styles, each with its own price level, amenities and reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelType {
    Luxury,
    Business,
    Budget,
    Boutique,
    Heritage,
}

impl HotelType {
    /// Price level before the proximity bump
    #[must_use]
    pub fn base_price_level(self) -> u8 {
        match self {
            HotelType::Budget => 1,
            HotelType::Business | HotelType::Boutique => 2,
            HotelType::Heritage => 3,
            HotelType::Luxury => 4,
        }
    }

    fn amenities(self) -> &'static [&'static str] {
        match self {
            HotelType::Luxury => &["Free WiFi", "Pool", "Spa", "Restaurant", "Room Service", "Valet Parking"],
            HotelType::Business => &["Free WiFi", "Business Center", "Fitness Center", "Meeting Rooms"],
            HotelType::Budget => &["Free WiFi", "Free Breakfast", "Parking"],
            HotelType::Boutique => &["Free WiFi", "Bar", "Designer Rooms", "Rooftop Terrace"],
            HotelType::Heritage => &["Free WiFi", "Restaurant", "Garden", "Guided Tours"],
        }
    }

    fn reviews(self) -> [(&'static str, &'static str, f32); 2] {
        match self {
            HotelType::Luxury => [
                ("Sarah M.", "Exceptional service and beautiful rooms.", 5.0),
                ("James L.", "Pricey but worth every penny.", 4.5),
            ],
            HotelType::Business => [
                ("David K.", "Quiet rooms and fast WiFi, ideal for work trips.", 4.5),
                ("Priya S.", "Convenient location close to the offices.", 4.0),
            ],
            HotelType::Budget => [
                ("Tom R.", "Clean and comfortable for the price.", 4.0),
                ("Ana G.", "Basic but the staff were very friendly.", 3.5),
            ],
            HotelType::Boutique => [
                ("Emma W.", "Stylish rooms with a lot of character.", 5.0),
                ("Lucas B.", "Great bar and a lovely rooftop.", 4.5),
            ],
            HotelType::Heritage => [
                ("Margaret H.", "A charming historic building, beautifully kept.", 4.5),
                ("Oliver P.", "Loved the garden and the old-world feel.", 4.5),
            ],
        }
    }
}

struct HotelTemplate {
    name: &'static str,
    rating: f32,
    kind: HotelType,
}

const fn template(name: &'static str, rating: f32, kind: HotelType) -> HotelTemplate {
    HotelTemplate { name, rating, kind }
}

const TEMPLATES: &[HotelTemplate] = &[
    template("Grand Plaza Hotel", 4.5, HotelType::Luxury),
    template("Business Suites", 4.2, HotelType::Business),
    template("Comfort Inn & Suites", 4.0, HotelType::Budget),
    template("Boutique Hotel Downtown", 4.7, HotelType::Boutique),
    template("City Center Lodge", 3.8, HotelType::Budget),
    template("The Heritage House", 4.4, HotelType::Heritage),
    template("Executive Tower Hotel", 4.3, HotelType::Business),
    template("Royal Palace Resort", 4.8, HotelType::Luxury),
];

/// Largest roster the generator can produce
pub const ROSTER_TEMPLATES: usize = TEMPLATES.len();

/// Maximum rating jitter applied to a template
const RATING_JITTER: f64 = 0.2;

/// Hotels are placed between these fractions of the search radius
const MIN_RADIUS_FRACTION: f64 = 0.05;
const MAX_RADIUS_FRACTION: f64 = 0.95;

/// Hotels within this fraction of the radius are one price level dearer
const PREMIUM_RADIUS_FRACTION: f64 = 0.25;

/// Generates a fixed roster of plausible hotels around a location
pub struct SyntheticAggregator {
    roster_size: usize,
    random: Arc<RandomSource>,
}

impl SyntheticAggregator {
    /// `roster_size` is capped at [`ROSTER_TEMPLATES`]
    #[must_use]
    pub fn new(roster_size: usize, random: Arc<RandomSource>) -> Self {
        Self {
            roster_size: roster_size.min(ROSTER_TEMPLATES),
            random,
        }
    }

    /// Generate the roster; infallible
    pub fn generate(&self, location: &ResolvedLocation, radius_meters: u32) -> Vec<HotelRecord> {
        let origin = location.coordinate;
        let radius_km = f64::from(radius_meters) / 1000.0;
        debug!(
            "Generating {} synthetic hotel(s) within {:.1} km of {}",
            self.roster_size, radius_km, location.display_address
        );

        TEMPLATES
            .iter()
            .take(self.roster_size)
            .enumerate()
            .map(|(index, template)| {
                let bearing = self.random.uniform(0.0..360.0);
                let offset_km = self
                    .random
                    .uniform(radius_km * MIN_RADIUS_FRACTION..radius_km * MAX_RADIUS_FRACTION);
                let coordinate = destination_point(origin, bearing, offset_km);
                let distance = distance_km(origin, coordinate);

                let mut price_level = template.kind.base_price_level();
                if distance <= radius_km * PREMIUM_RADIUS_FRACTION {
                    price_level = (price_level + 1).min(4);
                }

                let rating = (f64::from(template.rating) + self.random.jitter(RATING_JITTER))
                    .clamp(0.0, 5.0);
                let rating = ((rating * 10.0).round() / 10.0) as f32;

                HotelRecord {
                    id: format!("synthetic-{}", index + 1),
                    name: template.name.to_string(),
                    rating,
                    address: format!(
                        "{} Main St, Near {}",
                        100 + index * 50,
                        location.display_address
                    ),
                    distance_km: distance,
                    price_range_text: format_price_band(i32::from(price_level)).to_string(),
                    price_level: Some(price_level),
                    image_url: PLACEHOLDER_IMAGE.to_string(),
                    coordinate,
                    phone: Some(format!("+1 (555) {:03}-{:04}", 100 + index, 1000 + index * 111)),
                    website: Some(format!("https://www.{}.example", slug(template.name))),
                    amenities: template
                        .kind
                        .amenities()
                        .iter()
                        .map(|amenity| (*amenity).to_string())
                        .collect::<BTreeSet<_>>(),
                    reviews: template
                        .kind
                        .reviews()
                        .into_iter()
                        .map(|(author, text, rating)| Review::new(author, text, rating))
                        .collect(),
                    opening_hours: vec!["Open 24 hours".to_string()],
                }
            })
            .collect()
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[async_trait]
impl HotelAggregator for SyntheticAggregator {
    async fn find_hotels(
        &self,
        location: &ResolvedLocation,
        radius_meters: u32,
    ) -> Result<Vec<HotelRecord>> {
        Ok(self.generate(location, radius_meters))
    }
}
