//! Leg construction and path stitching.

use crate::models::{LatLng, LegSource, RouteLeg};
use crate::spatial::haversine_between;

/// A stop on the route: the origin (no id) or a shop.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: Option<String>,
    pub position: LatLng,
}

impl Stop {
    pub fn origin(position: LatLng) -> Self {
        Self { id: None, position }
    }

    pub fn shop(id: impl Into<String>, position: LatLng) -> Self {
        Self {
            id: Some(id.into()),
            position,
        }
    }
}

/// Straight segment between two stops with haversine distance and unknown duration.
pub fn straight_leg(from: &Stop, to: &Stop) -> RouteLeg {
    RouteLeg {
        from_id: from.id.clone(),
        to_id: to.id.clone().unwrap_or_default(),
        distance_meters: haversine_between(from.position, to.position),
        duration_seconds: None,
        path: vec![from.position, to.position],
        source: LegSource::StraightLine,
    }
}

/// Straight-line legs through every consecutive pair of `stops`.
pub fn straight_legs(stops: &[Stop]) -> Vec<RouteLeg> {
    stops
        .windows(2)
        .map(|pair| straight_leg(&pair[0], &pair[1]))
        .collect()
}

/// Concatenate leg paths, dropping a leg's first point when it exactly repeats
/// the point the path already ends on.
pub fn stitch<'a, I>(paths: I) -> Vec<LatLng>
where
    I: IntoIterator<Item = &'a [LatLng]>,
{
    let mut stitched: Vec<LatLng> = Vec::new();
    for path in paths {
        let skip = match (stitched.last(), path.first()) {
            (Some(last), Some(first)) if last == first => 1,
            _ => 0,
        };
        stitched.extend_from_slice(&path[skip.min(path.len())..]);
    }
    stitched
}

/// Stitched path of all legs.
pub fn stitch_legs(legs: &[RouteLeg]) -> Vec<LatLng> {
    stitch(legs.iter().map(|leg| leg.path.as_slice()))
}
