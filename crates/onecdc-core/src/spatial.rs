//! Spatial math for straight-line fallbacks.

use crate::models::LatLng;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters (Haversine formula).
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn haversine_between(a: LatLng, b: LatLng) -> f64 {
    haversine_distance(a.lat, a.lng, b.lat, b.lng)
}

/// Great-circle length of a path, summed over consecutive pairs.
pub fn path_length_m(path: &[LatLng]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_between(pair[0], pair[1]))
        .sum()
}
