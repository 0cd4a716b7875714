//! API key, base endpoint and protocol version.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Production base endpoint. Always ends with `/`.
pub const BASE_API: &str = "https://api.lob.com/v1/";

/// Protocol version sent on every request.
pub const API_VERSION: &str = "2016-06-30";

/// Header carrying [`API_VERSION`].
pub const VERSION_HEADER: &str = "Lob-Version";

/// Everything needed to authenticate against the API.
///
/// The key is the Basic auth username with an empty password. The
/// `Authorization` header value is computed once, at construction.
///
/// # Example
///
/// ```
/// use lob_core::{BASE_API, Credential};
///
/// let credential = Credential::new("test_key");
/// assert_eq!(credential.authorization(), "Basic dGVzdF9rZXk6");
/// assert_eq!(credential.base_url(), BASE_API);
/// ```
#[derive(Clone)]
pub struct Credential {
    api_key: Arc<str>,
    authorization: Arc<str>,
    base_url: Arc<str>,
    api_version: Arc<str>,
}

impl Credential {
    /// Credential for the production endpoint and the default version.
    #[must_use]
    pub fn new(api_key: impl AsRef<str>) -> Self {
        let api_key = api_key.as_ref();
        let encoded = STANDARD.encode(format!("{api_key}:"));
        Self {
            api_key: Arc::from(api_key),
            authorization: Arc::from(format!("Basic {encoded}")),
            base_url: Arc::from(BASE_API),
            api_version: Arc::from(API_VERSION),
        }
    }

    /// Target another base endpoint, e.g. a local mock server.
    ///
    /// Endpoints are appended to the base as-is, so it should end with `/`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = Arc::from(base_url.as_ref());
        self
    }

    /// Send another protocol version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl AsRef<str>) -> Self {
        self.api_version = Arc::from(api_version.as_ref());
        self
    }

    /// The API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Base endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Protocol version.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Full target URL of an endpoint, before the query string.
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}
