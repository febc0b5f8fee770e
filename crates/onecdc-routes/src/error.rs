use serde::Deserialize;
use thiserror::Error;

// Error body returned by the routing service on non-2xx responses.
#[derive(Deserialize, Debug)]
pub struct ServiceErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ServiceErrorPayload {
    pub error: ServiceErrorDetail,
}

#[derive(Error, Debug)]
pub enum RoutesError {
    #[error("routing service API key is not configured")]
    MissingApiKey,

    #[error("routing service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // Non-2xx whose body is not the structured error payload.
    #[error("unstructured routing service error (HTTP {status}): {body}")]
    RawApi { status: u16, body: String },

    #[error("routing service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse routing service response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("routing service returned no route legs")]
    MissingLegs,

    #[error("routing service returned no usable geometry")]
    EmptyGeometry,
}

/// The consumer stopped caring about this computation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("route computation aborted")]
pub struct Aborted;
