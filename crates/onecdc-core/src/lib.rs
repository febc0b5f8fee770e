pub mod display;
pub mod geometry;
pub mod models;
pub mod normalize;
pub mod polyline;
pub mod spatial;
pub mod totals;

pub use geometry::{stitch, stitch_legs, straight_leg, straight_legs, Stop};
pub use models::{LatLng, LegSource, RouteLeg, RouteResult, RouteSource, TravelMode, Waypoint};
pub use normalize::{
    coerce_id, normalize_waypoints, resolve_position, resolve_waypoint, Normalized, Rejection,
};
pub use polyline::PolylineError;
pub use spatial::haversine_distance;
pub use totals::{aggregate, parse_duration_seconds, RouteTotals};
