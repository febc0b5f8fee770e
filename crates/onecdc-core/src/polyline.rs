//! Encoded polyline codec at 1e5 precision, the Routes API default.

use crate::models::LatLng;
use geo_types::Coord;
use thiserror::Error;

const PRECISION: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("malformed polyline: {0}")]
    Decode(String),

    #[error("cannot encode polyline: {0}")]
    Encode(String),
}

/// Decode an encoded polyline into coordinates.
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, PolylineError> {
    let line = ::polyline::decode_polyline(encoded, PRECISION)
        .map_err(|err| PolylineError::Decode(err.to_string()))?;
    Ok(line
        .into_inner()
        .into_iter()
        .map(|coord| LatLng::new(coord.y, coord.x))
        .collect())
}

/// Encode coordinates as a polyline string. Fails on out-of-range coordinates.
pub fn encode(points: &[LatLng]) -> Result<String, PolylineError> {
    ::polyline::encode_coordinates(
        points.iter().map(|point| Coord {
            x: point.lng,
            y: point.lat,
        }),
        PRECISION,
    )
    .map_err(|err| PolylineError::Encode(err.to_string()))
}
