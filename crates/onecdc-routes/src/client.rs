//! Routes API HTTP client.

use crate::config::RoutesConfig;
use crate::error::{RoutesError, ServiceErrorPayload};
use onecdc_core::models::{LatLng, TravelMode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

const COMPUTE_ROUTES_PATH: &str = "/directions/v2:computeRoutes";
pub const FIELD_MASK: &str =
    "routes.legs.distanceMeters,routes.legs.duration,routes.legs.polyline.encodedPolyline";

/// Anything that can answer a `computeRoutes` request.
pub trait RouteService: Send + Sync {
    fn compute_routes(
        &self,
        request: &ComputeRoutesRequest,
    ) -> impl Future<Output = Result<ComputeRoutesResponse, RoutesError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiTravelMode {
    Drive,
    Walk,
    Transit,
}

impl From<TravelMode> for ApiTravelMode {
    fn from(mode: TravelMode) -> Self {
        match mode {
            TravelMode::Driving => ApiTravelMode::Drive,
            TravelMode::Walking => ApiTravelMode::Walk,
            TravelMode::Transit => ApiTravelMode::Transit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    pub lat_lng: ApiLatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiWaypoint {
    pub location: ApiLocation,
}

impl From<LatLng> for ApiWaypoint {
    fn from(point: LatLng) -> Self {
        Self {
            location: ApiLocation {
                lat_lng: ApiLatLng {
                    latitude: point.lat,
                    longitude: point.lng,
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRoutesRequest {
    pub origin: ApiWaypoint,
    pub destination: ApiWaypoint,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intermediates: Vec<ApiWaypoint>,
    pub travel_mode: ApiTravelMode,
    pub polyline_encoding: String,
    pub compute_alternative_routes: bool,
}

impl ComputeRoutesRequest {
    pub fn new(
        origin: LatLng,
        destination: LatLng,
        intermediates: impl IntoIterator<Item = LatLng>,
        mode: TravelMode,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            intermediates: intermediates.into_iter().map(ApiWaypoint::from).collect(),
            travel_mode: mode.into(),
            polyline_encoding: "ENCODED_POLYLINE".to_string(),
            compute_alternative_routes: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeRoutesResponse {
    #[serde(default)]
    pub routes: Vec<ApiRoute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRoute {
    #[serde(default)]
    pub legs: Vec<ApiLeg>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLeg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<ApiPolyline>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPolyline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_polyline: Option<String>,
}

/// HTTP client for the Routes API.
pub struct RoutesClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RoutesClient {
    pub fn new(config: &RoutesConfig) -> Result<Self, RoutesError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_s.max(1)))
                .build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl RouteService for RoutesClient {
    async fn compute_routes(
        &self,
        request: &ComputeRoutesRequest,
    ) -> Result<ComputeRoutesResponse, RoutesError> {
        let api_key = self.api_key.as_deref().ok_or(RoutesError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, COMPUTE_ROUTES_PATH);
        tracing::debug!(
            travel_mode = ?request.travel_mode,
            intermediates = request.intermediates.len(),
            "Calling routing service"
        );

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Try to parse the structured error first
            if let Ok(payload) = serde_json::from_str::<ServiceErrorPayload>(&text) {
                return Err(RoutesError::Api {
                    status: payload.error.code.unwrap_or(status.as_u16()),
                    message: payload.error.message,
                });
            }
            return Err(RoutesError::RawApi {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| {
            tracing::error!("Failed to parse routing response: {}. Body: {}", err, text);
            RoutesError::Parse(err)
        })
    }
}
