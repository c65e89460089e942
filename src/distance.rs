//! Great-circle distance helpers

use std::f64::consts::PI;

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::{Coordinate, HotelRecord};

/// Mean Earth radius used by the haversine crate for kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates in kilometers
///
/// For (near-)antipodal points rounding can push the haversine term past 1,
/// which makes the crate return NaN; those are reported as half the
/// circumference.
#[must_use]
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.lat,
        longitude: from.lng,
    };
    let to_haversine = HaversineLocation {
        latitude: to.lat,
        longitude: to.lng,
    };
    let km = distance(from_haversine, to_haversine, Units::Kilometers);
    if km.is_nan() { PI * EARTH_RADIUS_KM } else { km }
}

/// Point reached by travelling `distance_km` from `origin` along `bearing_degrees`
/// (clockwise from north)
#[must_use]
pub fn destination_point(origin: Coordinate, bearing_degrees: f64, distance_km: f64) -> Coordinate {
    let angular = distance_km / EARTH_RADIUS_KM;
    let bearing = bearing_degrees.to_radians();
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coordinate {
        lat: lat2.to_degrees().clamp(-90.0, 90.0),
        lng: normalize_longitude(lng2.to_degrees()),
    }
}

fn normalize_longitude(lng: f64) -> f64 {
    let wrapped = (lng + 540.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lng > 0.0 { 180.0 } else { wrapped }
}

/// Sort hotels closest first; equal distances fall back to name order
pub fn sort_by_distance(hotels: &mut [HotelRecord]) {
    hotels.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.name.cmp(&b.name))
    });
}
