//! Core data models for the route pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bare coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A shop the shopper selected, resolved to a drawable location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Transport mode chosen in the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    #[serde(alias = "WALK", alias = "WALKING")]
    Walking,
    #[serde(alias = "DRIVE", alias = "DRIVING")]
    Driving,
    #[serde(alias = "TRANSIT")]
    Transit,
}

impl TravelMode {
    /// Whether one routing request may carry intermediate stops.
    pub fn supports_intermediates(&self) -> bool {
        !matches!(self, TravelMode::Transit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" => Ok(TravelMode::Walking),
            "driving" | "drive" => Ok(TravelMode::Driving),
            "transit" => Ok(TravelMode::Transit),
            other => Err(format!("unknown transport mode: {}", other)),
        }
    }
}

/// Where a leg's geometry and metrics came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSource {
    Service,
    StraightLine,
}

/// Segment between two consecutive stops. The origin has no id, so the
/// first leg carries `from_id: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from_id: Option<String>,
    pub to_id: String,
    pub distance_meters: f64,
    /// Unknown for straight-line legs.
    pub duration_seconds: Option<u64>,
    pub path: Vec<LatLng>,
    pub source: LegSource,
}

/// Overall provenance of a computed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Service,
    Partial,
    StraightLine,
}

/// Route shown in the route view. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    pub mode: TravelMode,
    pub origin: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_address: Option<String>,
    pub waypoints: Vec<Waypoint>,
    pub legs: Vec<RouteLeg>,
    pub path: Vec<LatLng>,
    pub encoded_path: String,
    pub total_distance_meters: f64,
    /// `None` means "duration unavailable", which is not the same as zero.
    pub total_duration_seconds: Option<u64>,
    pub source: RouteSource,
    /// Records the normalizer could not resolve.
    pub dropped_waypoints: usize,
    pub computed_at: DateTime<Utc>,
}
