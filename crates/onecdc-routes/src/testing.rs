//! Scripted routing services for tests.

use crate::client::{
    ApiLeg, ApiPolyline, ApiRoute, ComputeRoutesRequest, ComputeRoutesResponse, RouteService,
};
use crate::error::RoutesError;
use onecdc_core::models::LatLng;
use onecdc_core::polyline;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) fn leg(distance_meters: f64, duration: &str, path: &[LatLng]) -> ApiLeg {
    ApiLeg {
        distance_meters: Some(distance_meters),
        duration: Some(duration.to_string()),
        polyline: Some(ApiPolyline {
            encoded_polyline: Some(polyline::encode(path).unwrap()),
        }),
    }
}

/// Answers requests from a queue; once it runs dry every call fails.
pub(crate) struct ScriptedService {
    responses: Mutex<VecDeque<Result<ComputeRoutesResponse, RoutesError>>>,
    requests: Mutex<Vec<ComputeRoutesRequest>>,
}

impl ScriptedService {
    pub(crate) fn new(batches: Vec<Result<Vec<ApiLeg>, RoutesError>>) -> Self {
        Self::with_responses(
            batches
                .into_iter()
                .map(|batch| {
                    batch.map(|legs| ComputeRoutesResponse {
                        routes: vec![ApiRoute { legs }],
                    })
                })
                .collect(),
        )
    }

    pub(crate) fn with_responses(
        responses: Vec<Result<ComputeRoutesResponse, RoutesError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self::with_responses(Vec::new())
    }

    pub(crate) fn requests(&self) -> Vec<ComputeRoutesRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl RouteService for ScriptedService {
    async fn compute_routes(
        &self,
        request: &ComputeRoutesRequest,
    ) -> Result<ComputeRoutesResponse, RoutesError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Err(RoutesError::RawApi {
                status: 503,
                body: "service unavailable".to_string(),
            })
        })
    }
}

/// Never answers; used to exercise aborts while a request is in flight.
pub(crate) struct StalledService;

impl RouteService for StalledService {
    async fn compute_routes(
        &self,
        _request: &ComputeRoutesRequest,
    ) -> Result<ComputeRoutesResponse, RoutesError> {
        std::future::pending().await
    }
}
