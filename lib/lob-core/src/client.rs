//! Transport trait.
//!
//! [`HttpClient`] is the seam between the lob API surface and the network.
//! `lob::HyperClient` is the production implementation; tests plug in
//! recording clients.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Executes one fully built request and buffers the whole response.
///
/// Implementations classify their failures as [`crate::Error::RequestConstruction`],
/// [`crate::Error::Network`] or [`crate::Error::BodyRead`]. Any HTTP status,
/// including 4xx and 5xx, is a successful execution: the status check is
/// made by the caller.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the response body
    /// cannot be read.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}
