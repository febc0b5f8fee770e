//! Shared server state: the routing client and in-flight route views.

use crate::config::Config;
use dashmap::DashMap;
use onecdc_routes::{AbortHandle, AbortSignal, FetchOptions, RoutesClient, RoutesError};

/// Application state shared by all handlers.
pub struct AppState {
    config: Config,
    routes: RoutesClient,
    fetch_options: FetchOptions,
    /// One abort handle per route view with a computation in flight.
    views: DashMap<String, AbortHandle>,
}

/// Registration of one computation for a route view. Dropping it unregisters
/// the view unless a newer computation has taken its place.
pub struct ViewLease<'a> {
    state: &'a AppState,
    view_id: String,
    handle: AbortHandle,
    signal: AbortSignal,
}

impl ViewLease<'_> {
    pub fn signal(&self) -> &AbortSignal {
        &self.signal
    }
}

impl Drop for ViewLease<'_> {
    fn drop(&mut self) {
        self.state
            .views
            .remove_if(&self.view_id, |_, current| current.same_as(&self.handle));
    }
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, RoutesError> {
        let routes = RoutesClient::new(&config.routes)?;
        let fetch_options = FetchOptions::from(&config.routes);
        Ok(Self {
            config,
            routes,
            fetch_options,
            views: DashMap::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn routes(&self) -> &RoutesClient {
        &self.routes
    }

    pub fn fetch_options(&self) -> &FetchOptions {
        &self.fetch_options
    }

    /// Start a computation for `view_id`, aborting the one it supersedes.
    pub fn begin_view(&self, view_id: &str) -> ViewLease<'_> {
        let (handle, signal) = AbortHandle::new();
        if let Some(previous) = self.views.insert(view_id.to_string(), handle.clone()) {
            tracing::debug!(view_id, "Superseding in-flight route computation");
            previous.abort();
        }
        ViewLease {
            state: self,
            view_id: view_id.to_string(),
            handle,
            signal,
        }
    }

    /// Abort the in-flight computation for `view_id`, if any.
    pub fn abort_view(&self, view_id: &str) -> bool {
        match self.views.remove(view_id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn active_views(&self) -> usize {
        self.views.len()
    }
}
