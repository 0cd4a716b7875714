//! Client for the lob.com postal and address verification API.
//!
//! Request records are plain `#[derive(Serialize)]` structs. [`encode`]
//! flattens them into a [`WireForm`], and [`Lob`] sends that form with one
//! of three verbs, decoding the JSON answer into a destination you provide.
//!
//! # Example
//!
//! ```no_run
//! use lob::prelude::*;
//!
//! #[derive(Serialize)]
//! struct ListParams {
//!     limit: i32,
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct Countries {
//!     data: Vec<serde_json::Value>,
//! }
//!
//! # async fn run() -> lob::Result<()> {
//! let lob = Lob::new(std::env::var("LOB_API_KEY").unwrap_or_default());
//! let params = encode(&ListParams { limit: 2 }).expect("supported fields");
//!
//! let mut countries = Countries::default();
//! match lob.get("countries", Some(&params), &mut countries).await {
//!     Ok(()) => println!("{} countries", countries.data.len()),
//!     Err(err) if err.is_client_error() => eprintln!("rejected: {err}"),
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Calls go through a [`HyperClient`]; tower middleware (logging, metrics
//! with the `middleware-metrics` feature) is added on its builder.

mod api;
mod client;
mod config;
mod connector;
mod diagnostics;
pub mod middleware;
pub mod prelude;

pub use api::{Lob, LobBuilder};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use lob_core::{
    API_VERSION, BASE_API, ContentType, Credential, EncodeError, Endpoint, Error, HttpClient,
    Method, Request, RequestBuilder, Response, Result, VERSION_HEADER, WireForm, decode_into,
    encode, from_json,
};

// Re-export http types for status codes and headers
pub use lob_core::{StatusCode, header};
