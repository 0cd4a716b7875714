//! Tower middleware layers for [`crate::HyperClient`].
//!
//! Layers are configured once, when the client is built, and apply to every
//! call made through it.
//!
//! | Feature | Description |
//! |---------|-------------|
//! | (always) | [`LoggingLayer`], `.with_logging()` / `.with_debug_logging()` |
//! | `middleware-metrics` | `MetricsLayer`, `.with_metrics()` |
//!
//! # Example
//!
//! ```no_run
//! use lob::HyperClient;
//! use lob::middleware::{LogLevel, LoggingLayer};
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::with_level(LogLevel::Debug))
//!     .build();
//! ```

mod logging;
#[cfg(feature = "middleware-metrics")]
mod metrics;

pub use logging::{LogLevel, Logging, LoggingLayer};
#[cfg(feature = "middleware-metrics")]
pub use metrics::{Metrics, MetricsLayer};

pub use tower::{Layer, ServiceBuilder};

/// Resource label of a request: the first segment of its
/// [`Endpoint`](lob_core::Endpoint), or `unknown` when the request was not
/// built by [`crate::Lob`].
pub(crate) fn resource_of<B>(request: &crate::Request<B>) -> String {
    request
        .extensions()
        .get::<lob_core::Endpoint>()
        .map_or_else(|| "unknown".to_string(), |e| e.resource().to_string())
}
