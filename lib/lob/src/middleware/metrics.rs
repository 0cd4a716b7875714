//! Metrics middleware using the `metrics` crate facade.
//!
//! Nothing is exported unless the application installs a recorder
//! (Prometheus, `StatsD`, ...).

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};

use super::resource_of;
use crate::{Error, Request, Response, Result};

const LABEL_METHOD: &str = "method";
const LABEL_RESOURCE: &str = "resource";
const LABEL_OUTCOME: &str = "outcome";

const METRIC_REQUESTS_TOTAL: &str = "lob_requests_total";
const METRIC_REQUEST_DURATION: &str = "lob_request_duration_seconds";
const METRIC_REQUESTS_IN_FLIGHT: &str = "lob_requests_in_flight";

/// Layer that records per-call metrics.
///
/// - `lob_requests_total` (counter): labeled by method, resource and outcome
///   (`ok`, `api_error` for any status but 200, `transport_error`)
/// - `lob_request_duration_seconds` (histogram): labeled by method and resource
/// - `lob_requests_in_flight` (gauge)
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer {
    _private: (),
}

impl MetricsLayer {
    /// Create a new metrics layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = Metrics<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Metrics { inner }
    }
}

/// Service that records per-call metrics.
#[derive(Debug, Clone)]
pub struct Metrics<S> {
    inner: S,
}

impl<S> Metrics<S> {
    /// Create a new metrics service wrapping the given service.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

/// Holds one unit of the in-flight gauge until dropped, so a cancelled
/// call is released too.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        metrics::gauge!(METRIC_REQUESTS_IN_FLIGHT).increment(1.0);
        Self
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        metrics::gauge!(METRIC_REQUESTS_IN_FLIGHT).decrement(1.0);
    }
}

fn outcome(result: &Result<Response<Bytes>>) -> &'static str {
    match result {
        Ok(response) if response.is_success() => "ok",
        Ok(_) => "api_error",
        Err(_) => "transport_error",
    }
}

impl<S> Service<Request<Bytes>> for Metrics<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method().to_string();
        let resource = resource_of(&request);
        let start = Instant::now();
        let mut inner = self.inner.clone();

        let in_flight = InFlight::enter();

        Box::pin(async move {
            let result = inner.call(request).await;
            drop(in_flight);

            metrics::histogram!(
                METRIC_REQUEST_DURATION,
                LABEL_METHOD => method.clone(),
                LABEL_RESOURCE => resource.clone()
            )
            .record(start.elapsed().as_secs_f64());

            metrics::counter!(
                METRIC_REQUESTS_TOTAL,
                LABEL_METHOD => method,
                LABEL_RESOURCE => resource,
                LABEL_OUTCOME => outcome(&result)
            )
            .increment(1);

            result
        })
    }
}
