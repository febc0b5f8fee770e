//! OneCDC Routes - routing service integration
//!
//! Talks to the Routes API, turns its legs into drawable geometry, and runs the
//! route view pipeline on top of `onecdc-core`.

pub mod abort;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use abort::{AbortHandle, AbortSignal};
pub use client::{ComputeRoutesRequest, ComputeRoutesResponse, RouteService, RoutesClient};
pub use config::RoutesConfig;
pub use error::{Aborted, RoutesError};
pub use fetcher::{fetch_route_geometry, FetchOptions, RouteGeometry};
pub use pipeline::{compute_route_view, RedirectReason, RouteView, RouteViewRequest};
