//! Display formatting for hotel results
//!
//! Turns raw hotel and distance data into display-ready strings and builds
//! the external directions links opened from a hotel card.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, HotelRecord};

/// Image shown when a hotel has no photo
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Price text used when a source gives no price level
pub const UNKNOWN_PRICE_BAND: &str = "$50-100";

/// Distance as kilometers with one decimal, e.g. `"1.2 km"`
#[must_use]
pub fn format_distance(km: f64) -> String {
    format!("{:.1} km", km.max(0.0))
}

/// Map a 0-4 price level to its nightly price band.
///
/// Out-of-range levels clamp to the nearest band.
#[must_use]
pub fn format_price_band(level: i32) -> &'static str {
    match level {
        i32::MIN..=0 => "$25-50",
        1 => "$50-100",
        2 => "$100-200",
        3 => "$200-400",
        _ => "$400+",
    }
}

/// Price band for an optional level
#[must_use]
pub fn price_band_text(level: Option<u8>) -> &'static str {
    level.map_or(UNKNOWN_PRICE_BAND, |level| format_price_band(i32::from(level)))
}

#[must_use]
pub fn format_rating(rating: f32) -> String {
    format!("{:.1} / 5", rating.clamp(0.0, 5.0))
}

/// First non-blank image URL, or the placeholder
#[must_use]
pub fn select_image_url<I, S>(candidates: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .find(|url| !url.as_ref().trim().is_empty())
        .map_or_else(|| PLACEHOLDER_IMAGE.to_string(), |url| url.as_ref().to_string())
}

/// Web mapping service used for directions links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionsProvider {
    #[default]
    #[serde(alias = "google")]
    GoogleMaps,
    #[serde(alias = "osm")]
    OpenStreetMap,
}

impl DirectionsProvider {
    /// Deep link showing driving directions from `origin` to `destination`
    #[must_use]
    pub fn directions_url(self, origin: Coordinate, destination: Coordinate) -> String {
        match self {
            DirectionsProvider::GoogleMaps => format!(
                "https://www.google.com/maps/dir/{},{}/{},{}/@{},{},15z",
                origin.lat,
                origin.lng,
                destination.lat,
                destination.lng,
                destination.lat,
                destination.lng
            ),
            DirectionsProvider::OpenStreetMap => format!(
                "https://www.openstreetmap.org/directions?engine=fossgis_osrm_car&route={}%2C{}%3B{}%2C{}",
                origin.lat, origin.lng, destination.lat, destination.lng
            ),
        }
    }
}

impl std::str::FromStr for DirectionsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" | "googlemaps" => Ok(DirectionsProvider::GoogleMaps),
            "osm" | "openstreetmap" => Ok(DirectionsProvider::OpenStreetMap),
            other => Err(format!("unknown directions provider '{other}'")),
        }
    }
}

/// Google Maps directions link from `origin` to `destination`
#[must_use]
pub fn build_directions_url(origin: Coordinate, destination: Coordinate) -> String {
    DirectionsProvider::GoogleMaps.directions_url(origin, destination)
}

/// A hotel ready to render as a card
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelView {
    #[serde(flatten)]
    pub hotel: HotelRecord,
    pub distance_text: String,
    pub rating_text: String,
    pub directions_url: Option<String>,
}

impl HotelView {
    /// Build the view; with an origin the card also carries a directions link
    #[must_use]
    pub fn new(
        hotel: HotelRecord,
        origin: Option<Coordinate>,
        provider: DirectionsProvider,
    ) -> Self {
        let directions_url = origin.map(|origin| provider.directions_url(origin, hotel.coordinate));
        Self {
            distance_text: format_distance(hotel.distance_km),
            rating_text: format_rating(hotel.rating),
            directions_url,
            hotel,
        }
    }
}

impl Display for HotelView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "🏨 {}", self.hotel.name)?;
        writeln!(
            f,
            "   ⭐ {}   📍 {}   💰 {}",
            self.rating_text, self.distance_text, self.hotel.price_range_text
        )?;
        writeln!(f, "   🗺️ {}", self.hotel.address)?;

        if let Some(phone) = &self.hotel.phone {
            writeln!(f, "   📞 {phone}")?;
        }
        if let Some(website) = &self.hotel.website {
            writeln!(f, "   🌐 {website}")?;
        }
        if !self.hotel.amenities.is_empty() {
            let amenities: Vec<&str> = self.hotel.amenities.iter().map(String::as_str).collect();
            writeln!(f, "   ✨ {}", amenities.join(", "))?;
        }
        if let Some(url) = &self.directions_url {
            writeln!(f, "   🧭 {url}")?;
        }
        Ok(())
    }
}
