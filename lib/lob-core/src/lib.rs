//! Core types for the lob.com API client.
//!
//! This crate holds everything that does not touch the network:
//! - [`encode`] and [`WireForm`] - Turn a typed request record into the flat
//!   key/value form the API accepts
//! - [`Credential`] - API key, base endpoint and protocol version
//! - [`Method`], [`Request`], [`Response`] - Plain HTTP data types
//! - [`Error`], [`EncodeError`] and [`Result`] - Error handling
//! - [`HttpClient`] - Trait implemented by transports
//! - [`Endpoint`] - Resource path attached to requests for middleware

mod body;
mod client;
mod credential;
mod endpoint;
mod error;
pub mod form;
mod method;
pub mod prelude;
mod request;
mod response;

pub use body::{ContentType, decode_into, from_json};
pub use client::HttpClient;
pub use credential::{API_VERSION, BASE_API, Credential, VERSION_HEADER};
pub use endpoint::Endpoint;
pub use error::{EncodeError, Error, Result};
pub use form::{WireForm, encode};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
