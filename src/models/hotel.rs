//! Hotel records produced by the aggregators

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A single guest review
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Review {
    pub author: String,
    pub text: String,
    /// Stars, 0-5
    pub rating: f32,
}

impl Review {
    pub fn new(author: impl Into<String>, text: impl Into<String>, rating: f32) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            rating,
        }
    }
}

/// A hotel near a search location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelRecord {
    /// Unique within one result set
    pub id: String,
    pub name: String,
    /// Stars, 0-5
    pub rating: f32,
    pub address: String,
    /// Great-circle distance from the search coordinate
    pub distance_km: f64,
    pub price_range_text: String,
    /// Coarse price bucket, 0-4
    pub price_level: Option<u8>,
    pub image_url: String,
    pub coordinate: Coordinate,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub amenities: BTreeSet<String>,
    pub reviews: Vec<Review>,
    /// Weekday opening-hours lines as provided by the source
    pub opening_hours: Vec<String>,
}
