//! Server configuration from environment.

use onecdc_routes::RoutesConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Where the route view sends shoppers when there is nothing to draw.
    pub cart_redirect_path: String,
    pub log_json: bool,
    pub routes: RoutesConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("ONECDC_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            cart_redirect_path: env::var("CART_REDIRECT_PATH")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| "/cart".to_string()),
            log_json: env::var("LOG_FORMAT")
                .map(|value| value.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            routes: RoutesConfig::from_env(),
        }
    }
}
