//! Body content types and JSON decoding.

use crate::Result;

/// Content type for request and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`), requested on every call.
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`),
    /// used for POST bodies.
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so that the error names the exact field that
/// failed (e.g. `deliverability_analysis.dpv_footnotes`).
///
/// # Example
///
/// ```
/// use lob_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Country { name: String, short_name: String }
///
/// let bytes = br#"{"name":"France","short_name":"FR"}"#;
/// let country: Country = from_json(bytes).expect("deserialize");
/// assert_eq!(country.short_name, "FR");
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| crate::Error::decode(e.path().to_string(), e.inner().to_string()))
}

/// Decode JSON bytes into an existing destination.
///
/// On success `dest` is replaced by the decoded value. On failure `dest` is
/// left untouched.
///
/// # Example
///
/// ```
/// use lob_core::decode_into;
///
/// let mut states: Vec<String> = Vec::new();
/// decode_into(br#"["CA","NY"]"#, &mut states).expect("decode");
/// assert_eq!(states, ["CA", "NY"]);
///
/// assert!(decode_into(b"<html>", &mut states).is_err());
/// assert_eq!(states, ["CA", "NY"]);
/// ```
pub fn decode_into<T: serde::de::DeserializeOwned>(bytes: &[u8], dest: &mut T) -> Result<()> {
    *dest = from_json(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::FormUrlEncoded.as_str(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn content_type_display() {
        assert_eq!(
            ContentType::FormUrlEncoded.to_string(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn from_json_syntax_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            id: String,
        }

        let err = from_json::<Address>(b"not json").expect_err("should fail");
        assert!(err.to_string().contains("JSON deserialization error"));
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Components {
            #[allow(dead_code)]
            zip_code: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Verification {
            #[allow(dead_code)]
            components: Components,
        }

        let err = from_json::<Verification>(br#"{"components":{}}"#).expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("components"), "Expected path in error: {msg}");
        assert!(msg.contains("zip_code"), "Expected field in error: {msg}");
    }

    #[test]
    fn decode_into_replaces_destination() {
        #[derive(Debug, Default, PartialEq, serde::Deserialize)]
        struct Address {
            id: String,
            name: Option<String>,
        }

        let mut address = Address::default();
        decode_into(br#"{"id":"adr_1","name":"Jane Doe"}"#, &mut address).expect("decode");
        assert_eq!(
            address,
            Address {
                id: "adr_1".to_string(),
                name: Some("Jane Doe".to_string()),
            }
        );
    }

    #[test]
    fn decode_into_keeps_destination_on_failure() {
        let mut value = serde_json::json!({"kept": true});
        let err = decode_into(b"{", &mut value).expect_err("truncated JSON");
        assert!(matches!(err, crate::Error::Decode { .. }));
        assert_eq!(value, serde_json::json!({"kept": true}));
    }
}
