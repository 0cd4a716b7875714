//! Error types for lob.

use derive_more::{Display, Error};

// ============================================================================
// Transport Error
// ============================================================================

/// Classified error returned by every API call.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// The request could not be built (malformed URL, invalid header, ...).
    #[display("request construction failed: {_0}")]
    RequestConstruction(#[error(not(source))] String),

    /// The server could not be reached.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),

    /// The response body stream failed after the headers were received.
    #[display("failed to read response body: {_0}")]
    BodyRead(#[error(not(source))] String),

    /// The API answered with a status other than 200.
    ///
    /// The destination of the call has still been populated on a best-effort
    /// basis from `body`.
    #[display("non-200 status code {status} returned from {url} with body {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Full target URL, query string included.
        url: String,
        /// Raw response body text.
        body: String,
    },

    /// The 200 response body did not match the destination's shape.
    #[display("JSON deserialization error at '{path}': {message}")]
    Decode {
        /// JSON path to the error (e.g., "address.components.zip_code").
        path: String,
        /// Error message.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a request construction error.
    #[must_use]
    pub fn request_construction(message: impl Into<String>) -> Self {
        Self::RequestConstruction(message.into())
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a body read error.
    #[must_use]
    pub fn body_read(message: impl Into<String>) -> Self {
        Self::BodyRead(message.into())
    }

    /// Create a status error from the raw response body.
    #[must_use]
    pub fn status_error(status: u16, url: impl Into<String>, body: &[u8]) -> Self {
        Self::Status {
            status,
            url: url.into(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Create a JSON decode error with path context.
    #[must_use]
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short, stable name of the error kind, suitable for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RequestConstruction(_) => "request_construction",
            Self::Network(_) => "network",
            Self::BodyRead(_) => "body_read",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
        }
    }

    /// Returns `true` if the server could not be reached.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Target URL of a status error.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Status { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Raw body text of a status error.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Decode the body of a status error as JSON.
    ///
    /// Useful when the destination passed to the call has a different shape
    /// than the API's error payload.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct LobError {
    ///     error: LobErrorDetail,
    /// }
    ///
    /// if let Err(err) = lob.get("addresses/adr_missing", None, &mut address).await {
    ///     if let Some(Ok(payload)) = err.decode_body::<LobError>() {
    ///         eprintln!("lob says: {}", payload.error.message);
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body.as_bytes()))
    }
}

// ============================================================================
// Encode Error
// ============================================================================

/// Error raised while turning a typed record into a [`crate::WireForm`].
///
/// These errors mean the record definition and the encoder disagree about
/// which field types exist. They are programming errors: fix the record type
/// rather than handling them at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EncodeError {
    /// A field holds a value of a type the wire format cannot express.
    #[display("unsupported type `{type_name}` for field `{field}`")]
    UnsupportedFieldType {
        /// Wire name of the offending field.
        field: String,
        /// Description of the rejected type.
        type_name: String,
    },

    /// The top-level value is not a record (struct or map).
    #[display("cannot encode `{type_name}` as a wire form, expected a struct or a map")]
    NotARecord {
        /// Description of the rejected value.
        type_name: String,
    },

    /// Error raised by a custom `Serialize` implementation.
    #[display("{_0}")]
    Custom(#[error(not(source))] String),
}

impl EncodeError {
    /// Create an unsupported field type error.
    #[must_use]
    pub fn unsupported(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedFieldType {
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::status_error(
            422,
            "https://api.lob.com/v1/verify",
            br#"{"error":{"message":"address not found"}}"#,
        );
        assert_eq!(
            err.to_string(),
            r#"non-200 status code 422 returned from https://api.lob.com/v1/verify with body {"error":{"message":"address not found"}}"#
        );

        let err = Error::network("connection refused");
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = Error::decode("address.zip_code", "invalid type: integer `1`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'address.zip_code': invalid type: integer `1`"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::status_error(404, "https://api.lob.com/v1/addresses/adr_1", b"");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(err.is_not_found());
        assert!(!err.is_server_error());

        let err = Error::status_error(503, "https://api.lob.com/v1/checks", b"");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());

        let err = Error::body_read("stream reset");
        assert_eq!(err.status(), None);
        assert!(!err.is_client_error());
    }

    #[test]
    fn error_kind() {
        assert_eq!(Error::request_construction("bad").kind(), "request_construction");
        assert_eq!(Error::network("down").kind(), "network");
        assert_eq!(Error::body_read("eof").kind(), "body_read");
        assert_eq!(Error::status_error(500, "u", b"").kind(), "status");
        assert_eq!(Error::decode("", "eof").kind(), "decode");
        assert!(Error::network("down").is_network());
    }

    #[test]
    fn error_url_and_body() {
        let err = Error::status_error(401, "https://api.lob.com/v1/checks", b"unauthorized");
        assert_eq!(err.url(), Some("https://api.lob.com/v1/checks"));
        assert_eq!(err.body(), Some("unauthorized"));

        assert!(Error::network("down").url().is_none());
        assert!(Error::network("down").body().is_none());
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct LobError {
            message: String,
        }

        let err = Error::status_error(422, "u", br#"{"message": "zip code is invalid"}"#);
        let decoded = err
            .decode_body::<LobError>()
            .expect("status error has a body")
            .expect("body is valid JSON");
        assert_eq!(
            decoded,
            LobError {
                message: "zip code is invalid".to_string()
            }
        );

        assert!(Error::network("down").decode_body::<LobError>().is_none());
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::unsupported("metadata", "u32");
        assert_eq!(
            err.to_string(),
            "unsupported type `u32` for field `metadata`"
        );

        let err = EncodeError::NotARecord {
            type_name: "str".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot encode `str` as a wire form, expected a struct or a map"
        );
    }
}
