//! Route view pipeline: navigation payload in, displayable route out.

use crate::abort::AbortSignal;
use crate::client::RouteService;
use crate::error::Aborted;
use crate::fetcher::{fetch_route_geometry, FetchOptions};
use chrono::Utc;
use onecdc_core::models::{RouteResult, TravelMode};
use onecdc_core::normalize::{coerce_id, normalize_waypoints, resolve_position};
use onecdc_core::polyline;
use onecdc_core::totals::aggregate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Keys under which a backend route plan lists its ordered shops.
const BACKEND_SHOP_KEYS: &[&str] = &["orderedShops", "shops", "route", "optimizedRoute", "waypoints"];

/// Navigation payload handed over by the cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteViewRequest {
    #[serde(default)]
    pub origin: Option<Value>,
    #[serde(default)]
    pub origin_address: Option<String>,
    /// Prior backend plan: a bare shop array or an object wrapping one. Any
    /// totals it carries are ignored.
    #[serde(default)]
    pub route_data: Option<Value>,
    #[serde(default)]
    pub transport_mode: TravelMode,
    #[serde(default)]
    pub selected_shop_ids: Option<Vec<Value>>,
    #[serde(default)]
    pub selected_count: Option<usize>,
    #[serde(default)]
    pub selected_shops_detailed: Vec<Value>,
}

impl RouteViewRequest {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    MissingOrigin,
    NoWaypoints,
}

impl std::fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectReason::MissingOrigin => f.write_str("no origin to route from"),
            RedirectReason::NoWaypoints => f.write_str("no selected shop could be placed on the map"),
        }
    }
}

/// What the route view should show.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteView {
    Ready(RouteResult),
    RedirectToCart { reason: RedirectReason },
}

fn backend_shops(route_data: Option<&Value>) -> &[Value] {
    match route_data {
        Some(Value::Array(shops)) => shops,
        Some(Value::Object(plan)) => BACKEND_SHOP_KEYS
            .iter()
            .find_map(|key| plan.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Compute the route for one navigation into the route view.
///
/// Returns `Err(Aborted)` if `signal` fires before the result is ready; a
/// late result is never handed back.
pub async fn compute_route_view<S: RouteService>(
    service: &S,
    options: &FetchOptions,
    request: &RouteViewRequest,
    signal: &AbortSignal,
) -> Result<RouteView, Aborted> {
    let Some(origin) = request
        .origin
        .as_ref()
        .and_then(resolve_position)
    else {
        tracing::info!("Route requested without an origin, redirecting to cart");
        return Ok(RouteView::RedirectToCart {
            reason: RedirectReason::MissingOrigin,
        });
    };

    let selected_ids: Option<Vec<String>> = request
        .selected_shop_ids
        .as_ref()
        .map(|ids| ids.iter().filter_map(coerce_id).collect());

    let normalized = normalize_waypoints(
        backend_shops(request.route_data.as_ref()),
        &request.selected_shops_detailed,
        selected_ids.as_deref(),
        request.selected_count,
    );

    if normalized.waypoints.is_empty() {
        tracing::info!(
            dropped = normalized.dropped,
            "No displayable shops in route request, redirecting to cart"
        );
        return Ok(RouteView::RedirectToCart {
            reason: RedirectReason::NoWaypoints,
        });
    }

    let mode = request.transport_mode;
    let geometry = fetch_route_geometry(
        service,
        origin,
        &normalized.waypoints,
        mode,
        options,
        signal,
    )
    .await?;

    if signal.is_aborted() {
        return Err(Aborted);
    }

    let totals = aggregate(&geometry.legs);
    let encoded_path = polyline::encode(&geometry.path).unwrap_or_else(|err| {
        tracing::warn!("Route path not encodable: {}", err);
        String::new()
    });
    tracing::info!(
        %mode,
        shops = normalized.waypoints.len(),
        dropped = normalized.dropped,
        distance_m = totals.distance_meters,
        duration_s = ?totals.duration_seconds,
        source = ?totals.source,
        "Route computed"
    );

    Ok(RouteView::Ready(RouteResult {
        mode,
        origin,
        origin_address: request
            .origin_address
            .as_ref()
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty()),
        waypoints: normalized.waypoints,
        encoded_path,
        path: geometry.path,
        legs: geometry.legs,
        total_distance_meters: totals.distance_meters,
        total_duration_seconds: totals.duration_seconds,
        source: totals.source,
        dropped_waypoints: normalized.dropped,
        computed_at: Utc::now(),
    }))
}
