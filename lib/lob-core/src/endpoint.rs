//! Endpoint marker for middleware access.

/// The API endpoint a request targets, relative to the base URL.
///
/// The `lob` client stores it in the request extensions so that middleware
/// can label requests by resource without parsing URLs.
///
/// # Example
///
/// ```
/// use lob_core::Endpoint;
///
/// let endpoint = Endpoint::new("addresses/adr_123");
/// assert_eq!(endpoint.resource(), "addresses");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    /// Create a new endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self(endpoint.into())
    }

    /// Get the endpoint string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First path segment, e.g. `addresses` for `addresses/adr_123`.
    ///
    /// Identifiers never appear in it, which keeps metric labels bounded.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.0
            .trim_start_matches('/')
            .split(['/', '?'])
            .next()
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
