//! Route view handlers.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use onecdc_routes::{
    compute_route_view, AbortSignal, Aborted, RedirectReason, RouteView, RouteViewRequest,
};

#[derive(Debug, Serialize)]
pub struct RedirectBody {
    pub redirect: String,
    pub reason: RedirectReason,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

fn into_response(state: &AppState, outcome: Result<RouteView, Aborted>) -> Response {
    match outcome {
        Ok(RouteView::Ready(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(RouteView::RedirectToCart { reason }) => {
            let cart = state.config().cart_redirect_path.clone();
            (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, cart.clone())],
                Json(RedirectBody {
                    redirect: cart,
                    reason,
                }),
            )
                .into_response()
        }
        Err(Aborted) => (
            StatusCode::CONFLICT,
            Json(ErrorBody {
                error: "route view superseded",
            }),
        )
            .into_response(),
    }
}

/// POST /v1/routes
pub async fn compute_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteViewRequest>,
) -> Response {
    let outcome = compute_route_view(
        state.routes(),
        state.fetch_options(),
        &request,
        &AbortSignal::never(),
    )
    .await;
    into_response(&state, outcome)
}

/// POST /v1/route-views/:view_id
///
/// Like `/v1/routes`, but a later request for the same view cancels this one.
pub async fn compute_view_route(
    State(state): State<Arc<AppState>>,
    Path(view_id): Path<String>,
    Json(request): Json<RouteViewRequest>,
) -> Response {
    let lease = state.begin_view(&view_id);
    let outcome = compute_route_view(
        state.routes(),
        state.fetch_options(),
        &request,
        lease.signal(),
    )
    .await;
    drop(lease);

    if outcome.is_err() {
        tracing::info!(view_id = %view_id, "Route computation abandoned");
    }
    into_response(&state, outcome)
}

/// DELETE /v1/route-views/:view_id
pub async fn abort_view_route(
    State(state): State<Arc<AppState>>,
    Path(view_id): Path<String>,
) -> StatusCode {
    if state.abort_view(&view_id) {
        tracing::info!(view_id = %view_id, "Route view closed");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
