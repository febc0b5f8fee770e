use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{request_id, route_views};
use crate::state::AppState;

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/routes", post(route_views::compute_route))
        .route(
            "/v1/route-views/:view_id",
            post(route_views::compute_view_route).delete(route_views::abort_view_route),
        )
}

pub fn create_app(state: Arc<AppState>) -> Router {
    create_router()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::ensure_request_id))
        .layer(CorsLayer::permissive())
}
