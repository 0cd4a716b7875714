//! Wire form encoding.
//!
//! The lob.com API takes flat `key=value` pairs, either as a URL query string
//! (GET) or as an `application/x-www-form-urlencoded` body (POST). Request
//! records are ordinary `#[derive(Serialize)]` structs; the serde name of each
//! field (`#[serde(rename = "...")]`) is its wire name.
//!
//! [`encode`] walks the record and applies one rule per field type:
//!
//! | Field type | Included when | Rendered as |
//! |------------|---------------|-------------|
//! | `Option<String>` | `Some` | the string, even if empty |
//! | `String` | non-empty | the string |
//! | `i32` | non-zero | decimal |
//! | `Option<bool>` | `Some` | `true` / `false` |
//! | `i64` | non-zero | decimal |
//! | `f64` | always | two decimals (`3.50`) |
//! | `Vec<String>` | non-empty | elements joined by a space |
//! | `HashMap<String, String>` | per entry | `field[key]=value` |
//!
//! Any other field type is rejected with
//! [`EncodeError::UnsupportedFieldType`](crate::EncodeError::UnsupportedFieldType).
//!
//! # Example
//!
//! ```
//! use lob_core::encode;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Recipient {
//!     name: String,
//!     zip: String,
//!     count: i32,
//!     amount: f64,
//! }
//!
//! let form = encode(&Recipient {
//!     name: "Jane Doe".to_string(),
//!     zip: String::new(),
//!     count: 0,
//!     amount: 3.5,
//! })
//! .expect("supported fields");
//!
//! assert_eq!(form.get("name"), Some("Jane Doe"));
//! assert_eq!(form.get("amount"), Some("3.50"));
//! assert_eq!(form.len(), 2);
//! ```

mod ser;

use std::collections::BTreeMap;
use std::collections::btree_map;

use bytes::Bytes;
use serde::Serialize;
use url::form_urlencoded;

use crate::EncodeError;

/// Encode a typed request record into a [`WireForm`].
///
/// # Errors
///
/// Returns [`EncodeError::UnsupportedFieldType`] if a field holds a type
/// outside the supported set, and [`EncodeError::NotARecord`] if `record` is
/// not a struct or a map.
pub fn encode<T: Serialize + ?Sized>(record: &T) -> Result<WireForm, EncodeError> {
    record.serialize(ser::RecordSerializer)
}

/// Flat mapping from wire field name to string value.
///
/// Keys are unique. Iteration follows key order, which keeps query strings
/// and bodies deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WireForm(BTreeMap<String, String>);

impl WireForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the previous value if the key was present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns `true` if the form holds the field.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the form holds no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as a URL query string suffix.
    ///
    /// Returns `?` followed by the `&`-joined, percent-encoded pairs, or an
    /// empty string when the form is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use lob_core::WireForm;
    ///
    /// let form: WireForm = [("limit", "10"), ("metadata[campaign]", "fall sale")]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(form.to_query_string(), "?limit=10&metadata%5Bcampaign%5D=fall+sale");
    /// assert_eq!(WireForm::new().to_query_string(), "");
    /// ```
    #[must_use]
    pub fn to_query_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("?{}", self.url_encoded())
    }

    /// Render as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn to_body(&self) -> Bytes {
        Bytes::from(self.url_encoded())
    }

    fn url_encoded(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WireForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for WireForm {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for WireForm {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a WireForm {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Recipient {
        #[serde(rename = "name")]
        full_name: String,
        zip: String,
        count: i32,
        amount: f64,
    }

    #[test]
    fn encode_skips_zero_values() {
        let form = encode(&Recipient {
            full_name: "Jane Doe".to_string(),
            zip: String::new(),
            count: 0,
            amount: 3.5,
        })
        .expect("encode");

        let expected: WireForm = [("name", "Jane Doe"), ("amount", "3.50")].into_iter().collect();
        assert_eq!(form, expected);
    }

    #[derive(Debug, Default, Serialize)]
    struct CreateCheck {
        description: Option<String>,
        to: String,
        memo: String,
        check_number: i32,
        logo_enabled: Option<bool>,
        amount_cents: i64,
        amount: f64,
        tags: Vec<String>,
        metadata: HashMap<String, String>,
    }

    #[test]
    fn encode_all_supported_types_with_values() {
        let record = CreateCheck {
            description: Some("October rent".to_string()),
            to: "adr_123".to_string(),
            memo: "rent".to_string(),
            check_number: 10_042,
            logo_enabled: Some(false),
            amount_cents: 1_250_000_000_000,
            amount: 1250.0,
            tags: vec!["rent".to_string(), "monthly".to_string()],
            metadata: HashMap::from([
                ("campaign".to_string(), "fall".to_string()),
                ("unit".to_string(), "4B".to_string()),
            ]),
        };

        let form = encode(&record).expect("encode");

        check!(form.get("description") == Some("October rent"));
        check!(form.get("to") == Some("adr_123"));
        check!(form.get("memo") == Some("rent"));
        check!(form.get("check_number") == Some("10042"));
        check!(form.get("logo_enabled") == Some("false"));
        check!(form.get("amount_cents") == Some("1250000000000"));
        check!(form.get("amount") == Some("1250.00"));
        check!(form.get("tags") == Some("rent monthly"));
        check!(form.get("metadata[campaign]") == Some("fall"));
        check!(form.get("metadata[unit]") == Some("4B"));
        check!(!form.contains_key("metadata"));
        check!(form.len() == 10);
    }

    #[test]
    fn encode_all_supported_types_empty() {
        let form = encode(&CreateCheck::default()).expect("encode");

        // Only the float survives: it is always sent.
        let expected: WireForm = [("amount", "0.00")].into_iter().collect();
        assert_eq!(form, expected);
    }

    #[test]
    fn encode_present_empty_optional_string() {
        let record = CreateCheck {
            description: Some(String::new()),
            ..CreateCheck::default()
        };

        let form = encode(&record).expect("encode");
        check!(form.get("description") == Some(""));
    }

    #[test]
    fn encode_optional_bool_true() {
        let record = CreateCheck {
            logo_enabled: Some(true),
            ..CreateCheck::default()
        };

        let form = encode(&record).expect("encode");
        check!(form.get("logo_enabled") == Some("true"));
    }

    #[test]
    fn encode_float_rounding() {
        #[derive(Serialize)]
        struct Amounts {
            small: f64,
            negative: f64,
            many_digits: f64,
        }

        let form = encode(&Amounts {
            small: 0.004,
            negative: -12.5,
            many_digits: 19.999,
        })
        .expect("encode");

        check!(form.get("small") == Some("0.00"));
        check!(form.get("negative") == Some("-12.50"));
        check!(form.get("many_digits") == Some("20.00"));
    }

    #[test]
    fn encode_negative_integers() {
        #[derive(Serialize)]
        struct Offsets {
            small: i32,
            wide: i64,
        }

        let form = encode(&Offsets {
            small: -3,
            wide: -9_000_000_000,
        })
        .expect("encode");

        check!(form.get("small") == Some("-3"));
        check!(form.get("wide") == Some("-9000000000"));
    }

    #[test]
    fn encode_respects_serde_skip() {
        #[derive(Serialize)]
        struct Filter {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<String>,
            #[serde(skip)]
            #[allow(dead_code)]
            internal: u64,
        }

        let form = encode(&Filter {
            offset: None,
            internal: 7,
        })
        .expect("skipped fields never reach the encoder");
        check!(form.is_empty());
    }

    #[test]
    fn encode_borrowed_fields() {
        #[derive(Serialize)]
        struct Lookup<'a> {
            address: &'a str,
            tags: &'a [String],
            city: Option<&'a str>,
        }

        let tags = vec!["a".to_string()];
        let form = encode(&Lookup {
            address: "185 Berry St",
            tags: &tags,
            city: Some("San Francisco"),
        })
        .expect("encode");

        check!(form.get("address") == Some("185 Berry St"));
        check!(form.get("tags") == Some("a"));
        check!(form.get("city") == Some("San Francisco"));
    }

    #[test]
    fn encode_map_record() {
        let params = HashMap::from([("limit".to_string(), "10".to_string())]);
        let form = encode(&params).expect("maps are records");
        check!(form.get("limit") == Some("10"));
    }

    #[test]
    fn encode_rejects_bare_bool() {
        #[derive(Serialize)]
        struct Settings {
            color: bool,
        }

        let_assert!(
            Err(EncodeError::UnsupportedFieldType { field, type_name }) =
                encode(&Settings { color: true })
        );
        check!(field == "color");
        check!(type_name == "bool");
    }

    #[test]
    fn encode_rejects_unsigned_even_when_zero() {
        #[derive(Serialize)]
        struct Page {
            limit: u32,
        }

        let_assert!(
            Err(EncodeError::UnsupportedFieldType { field, type_name }) =
                encode(&Page { limit: 0 })
        );
        check!(field == "limit");
        check!(type_name == "u32");
    }

    #[test]
    fn encode_rejects_nested_struct() {
        #[derive(Serialize)]
        struct Address {
            line1: String,
        }

        #[derive(Serialize)]
        struct Letter {
            to: Address,
        }

        let result = encode(&Letter {
            to: Address {
                line1: "185 Berry St".to_string(),
            },
        });
        check!(result == Err(EncodeError::unsupported("to", "struct Address")));
    }

    #[test]
    fn encode_rejects_list_of_integers() {
        #[derive(Serialize)]
        struct Batch {
            ids: Vec<i64>,
        }

        let result = encode(&Batch { ids: vec![1, 2] });
        check!(result == Err(EncodeError::unsupported("ids", "list of i64")));
    }

    #[test]
    fn encode_rejects_optional_integer() {
        #[derive(Serialize)]
        struct Page {
            offset: Option<i32>,
        }

        // `None` is an absence marker and is skipped before any type check.
        check!(encode(&Page { offset: None }).is_ok());

        let result = encode(&Page { offset: Some(5) });
        check!(result == Err(EncodeError::unsupported("offset", "optional i32")));
    }

    #[test]
    fn encode_rejects_non_string_map_values() {
        #[derive(Serialize)]
        struct Tagged {
            metadata: HashMap<String, i32>,
        }

        let result = encode(&Tagged {
            metadata: HashMap::from([("count".to_string(), 1)]),
        });
        check!(result == Err(EncodeError::unsupported("metadata[count]", "i32")));
    }

    #[test]
    fn encode_rejects_non_record() {
        let_assert!(Err(EncodeError::NotARecord { type_name }) = encode("plain text"));
        check!(type_name == "str");

        let_assert!(Err(EncodeError::NotARecord { type_name }) = encode(&42_i64));
        check!(type_name == "i64");
    }

    #[test]
    fn query_string_empty_form() {
        check!(WireForm::new().to_query_string().is_empty());
    }

    #[test]
    fn query_string_is_percent_encoded() {
        let form: WireForm = [
            ("address_line1", "185 Berry St #6100"),
            ("name", "Tom & Jerry"),
            ("eq", "a=b"),
        ]
        .into_iter()
        .collect();

        insta::assert_snapshot!(
            form.to_query_string(),
            @"?address_line1=185+Berry+St+%236100&eq=a%3Db&name=Tom+%26+Jerry"
        );
    }

    #[test]
    fn body_encodes_bracketed_keys() {
        let form: WireForm = [("metadata[campaign]", "fall"), ("to", "adr_1")]
            .into_iter()
            .collect();

        insta::assert_snapshot!(
            String::from_utf8_lossy(&form.to_body()),
            @"metadata%5Bcampaign%5D=fall&to=adr_1"
        );
    }

    #[test]
    fn wire_form_insert_and_extend() {
        let mut form = WireForm::new();
        check!(form.insert("limit", "10").is_none());
        check!(form.insert("limit", "20") == Some("10".to_string()));
        form.extend([("offset", "5")]);

        let pairs: Vec<(&str, &str)> = form.iter().collect();
        check!(pairs == [("limit", "20"), ("offset", "5")]);
    }
}
