//! Route geometry fetching and stitching.
//!
//! The stop list `[origin, shop1, ..., shopN]` is split into batches, one
//! routing-service request each. Walking and driving carry intermediates, so a
//! cart normally needs a single request; transit cannot, so every leg is its own
//! batch. Batches are fetched concurrently and stitched back in order. A batch
//! that fails for any reason degrades to straight lines with haversine distance.

use crate::abort::AbortSignal;
use crate::client::{ApiLeg, ComputeRoutesRequest, ComputeRoutesResponse, RouteService};
use crate::config::{RoutesConfig, MAX_INTERMEDIATES};
use crate::error::{Aborted, RoutesError};
use futures::future::join_all;
use onecdc_core::geometry::{stitch_legs, straight_leg, straight_legs, Stop};
use onecdc_core::models::{LatLng, LegSource, RouteLeg, TravelMode, Waypoint};
use onecdc_core::polyline;
use onecdc_core::spatial::path_length_m;
use onecdc_core::totals::parse_duration_seconds;

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub max_intermediates: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_intermediates: MAX_INTERMEDIATES,
        }
    }
}

impl From<&RoutesConfig> for FetchOptions {
    fn from(config: &RoutesConfig) -> Self {
        Self {
            max_intermediates: config.max_intermediates,
        }
    }
}

/// Legs and stitched path connecting the origin to every waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub legs: Vec<RouteLeg>,
    pub path: Vec<LatLng>,
}

/// Split `stops` into overlapping request batches; consecutive batches share
/// their boundary stop.
pub fn plan_batches(stops: &[Stop], mode: TravelMode, max_intermediates: usize) -> Vec<&[Stop]> {
    let legs_per_batch = if mode.supports_intermediates() {
        max_intermediates.min(MAX_INTERMEDIATES) + 1
    } else {
        1
    };

    let mut batches = Vec::new();
    let mut start = 0usize;
    while start + 1 < stops.len() {
        let end = (start + legs_per_batch).min(stops.len() - 1);
        batches.push(&stops[start..=end]);
        start = end;
    }
    batches
}

fn batch_request(batch: &[Stop], mode: TravelMode) -> ComputeRoutesRequest {
    let origin = batch[0].position;
    let destination = batch[batch.len() - 1].position;
    let intermediates = batch[1..batch.len() - 1].iter().map(|stop| stop.position);
    ComputeRoutesRequest::new(origin, destination, intermediates, mode)
}

fn service_leg(from: &Stop, to: &Stop, api_leg: &ApiLeg) -> (RouteLeg, bool) {
    let decoded = api_leg
        .polyline
        .as_ref()
        .and_then(|p| p.encoded_polyline.as_deref())
        .filter(|encoded| !encoded.is_empty())
        .map(polyline::decode);

    let (path, has_geometry) = match decoded {
        Some(Ok(points)) if points.len() >= 2 => (points, true),
        Some(Err(err)) => {
            tracing::warn!(to = ?to.id, "Undecodable leg polyline: {}", err);
            (vec![from.position, to.position], false)
        }
        _ => (vec![from.position, to.position], false),
    };

    // Without a reported distance, measure the drawn path.
    let distance_meters = api_leg
        .distance_meters
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or_else(|| path_length_m(&path));

    let leg = RouteLeg {
        from_id: from.id.clone(),
        to_id: to.id.clone().unwrap_or_default(),
        distance_meters,
        duration_seconds: Some(parse_duration_seconds(api_leg.duration.as_deref())),
        path,
        source: LegSource::Service,
    };
    (leg, has_geometry)
}

/// Turn one batch response into legs, or an error when it has nothing drawable.
fn legs_from_response(
    batch: &[Stop],
    response: ComputeRoutesResponse,
) -> Result<Vec<RouteLeg>, RoutesError> {
    let route = response
        .routes
        .into_iter()
        .next()
        .filter(|route| !route.legs.is_empty())
        .ok_or(RoutesError::MissingLegs)?;

    let expected = batch.len() - 1;
    if route.legs.len() != expected {
        tracing::warn!(
            expected,
            returned = route.legs.len(),
            "Routing service leg count does not match the requested stops"
        );
    }

    let mut legs = Vec::with_capacity(expected);
    let mut any_geometry = false;
    for (pair, api_leg) in batch.windows(2).zip(route.legs.iter()) {
        let (leg, has_geometry) = service_leg(&pair[0], &pair[1], api_leg);
        any_geometry |= has_geometry;
        legs.push(leg);
    }
    if !any_geometry {
        return Err(RoutesError::EmptyGeometry);
    }

    // Stops the service returned no leg for.
    for pair in batch.windows(2).skip(legs.len()) {
        legs.push(straight_leg(&pair[0], &pair[1]));
    }
    Ok(legs)
}

async fn fetch_batch<S: RouteService>(
    service: &S,
    batch: &[Stop],
    mode: TravelMode,
    signal: &AbortSignal,
) -> Result<Vec<RouteLeg>, Aborted> {
    if signal.is_aborted() {
        return Err(Aborted);
    }

    let request = batch_request(batch, mode);
    let outcome = tokio::select! {
        biased;
        _ = signal.aborted() => return Err(Aborted),
        result = service.compute_routes(&request) => result,
    };

    match outcome.and_then(|response| legs_from_response(batch, response)) {
        Ok(legs) => Ok(legs),
        Err(err) => {
            tracing::warn!(
                %mode,
                stops = batch.len(),
                "Routing service unavailable for batch, drawing straight lines: {}",
                err
            );
            Ok(straight_legs(batch))
        }
    }
}

/// Fetch a drawable route from `origin` through `waypoints` in order.
///
/// Never fails on service errors; only an abort stops it.
pub async fn fetch_route_geometry<S: RouteService>(
    service: &S,
    origin: LatLng,
    waypoints: &[Waypoint],
    mode: TravelMode,
    options: &FetchOptions,
    signal: &AbortSignal,
) -> Result<RouteGeometry, Aborted> {
    let stops: Vec<Stop> = std::iter::once(Stop::origin(origin))
        .chain(
            waypoints
                .iter()
                .map(|waypoint| Stop::shop(waypoint.id.clone(), waypoint.position())),
        )
        .collect();

    let batches = plan_batches(&stops, mode, options.max_intermediates);
    tracing::debug!(%mode, batches = batches.len(), stops = stops.len(), "Fetching route geometry");

    let results = join_all(
        batches
            .iter()
            .map(|batch| fetch_batch(service, batch, mode, signal)),
    )
    .await;

    let mut legs = Vec::with_capacity(stops.len().saturating_sub(1));
    for result in results {
        legs.extend(result?);
    }

    let path = stitch_legs(&legs);
    Ok(RouteGeometry { legs, path })
}
