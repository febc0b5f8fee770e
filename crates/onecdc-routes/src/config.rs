//! Routing service configuration from environment.

use std::env;

pub const DEFAULT_API_URL: &str = "https://routes.googleapis.com";
/// Most intermediates the service accepts in one request.
pub const MAX_INTERMEDIATES: usize = 25;

#[derive(Debug, Clone)]
pub struct RoutesConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_s: u64,
    pub max_intermediates: usize,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout_s: 10,
            max_intermediates: MAX_INTERMEDIATES,
        }
    }
}

impl RoutesConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("ROUTES_API_URL")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.api_url),
            api_key: env::var("ROUTES_API_KEY")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            timeout_s: env::var("ROUTES_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_s),
            max_intermediates: env::var("ROUTES_MAX_INTERMEDIATES")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(defaults.max_intermediates)
                .clamp(1, MAX_INTERMEDIATES),
        }
    }
}
