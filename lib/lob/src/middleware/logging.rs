//! Request/response logging middleware.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use super::resource_of;
use crate::{Error, Request, Response, Result};

/// Layer that logs every call with `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Request line plus headers, at debug level.
    Debug,
    /// Request line only, at info level.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self::with_level(LogLevel::Debug)
    }

    /// Create a logging layer with an explicit level.
    #[must_use]
    pub const fn with_level(level: LogLevel) -> Self {
        Self { level }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Create a new logging service wrapping the given service.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

impl<S> Service<Request<Bytes>> for Logging<S>
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
        let method = request.method();
        let url = request.url().to_string();
        let resource = resource_of(&request);
        let level = self.level;

        let span = span!(Level::INFO, "lob_request", %method, %resource);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        // Authorization is a credential.
                        let headers: Vec<(&str, &str)> = request
                            .headers()
                            .iter()
                            .filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
                            .map(|(name, value)| (name.as_str(), value.as_str()))
                            .collect();
                        debug!(headers = ?headers, "Lob {method} {url}");
                    }
                    LogLevel::Info => {
                        info!("Lob {method} {url}");
                    }
                }

                let result = inner.call(request).await;

                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_success() => {
                        info!(status = response.status(), elapsed_ms, "request completed");
                    }
                    Ok(response) => {
                        warn!(
                            status = response.status(),
                            elapsed_ms, "request failed with API error"
                        );
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tower::ServiceExt;

    use super::*;
    use crate::Method;

    #[derive(Clone)]
    struct Echo;

    impl Service<Request<Bytes>> for Echo {
        type Response = Response<Bytes>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, request: Request<Bytes>) -> Self::Future {
            let status = if request.url().path().ends_with("missing") {
                404
            } else {
                200
            };
            Box::pin(async move { Ok(Response::new(status, HashMap::new(), Bytes::new())) })
        }
    }

    fn request(path: &str) -> Request<Bytes> {
        let url = url::Url::parse(&format!("https://api.lob.com/v1/{path}")).expect("valid url");
        Request::builder(Method::Get, url)
            .header("Authorization", "Basic dGVzdF9rZXk6")
            .build()
    }

    #[test]
    fn logging_layer_default() {
        let layer = LoggingLayer::new();
        assert_eq!(layer.level, LogLevel::Info);
    }

    #[test]
    fn logging_layer_debug() {
        let layer = LoggingLayer::debug();
        assert_eq!(layer.level, LogLevel::Debug);
    }

    #[tokio::test]
    async fn logging_passes_responses_through() {
        let mut service = LoggingLayer::debug().layer(Echo);

        let response = service
            .ready()
            .await
            .expect("ready")
            .call(request("countries"))
            .await
            .expect("response");
        assert_eq!(response.status(), 200);

        let response = service
            .ready()
            .await
            .expect("ready")
            .call(request("addresses/missing"))
            .await
            .expect("response");
        assert_eq!(response.status(), 404);
    }
}
