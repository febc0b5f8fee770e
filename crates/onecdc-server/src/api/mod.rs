//! API routes for the route view server.

pub mod request_id;
pub mod route_views;
mod routes;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;

/// The complete service: routes, health check, state and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    routes::create_app(state)
}

#[cfg(test)]
mod tests;
