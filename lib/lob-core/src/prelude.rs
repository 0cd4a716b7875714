//! Prelude module for convenient imports.
//!
//! ```ignore
//! use lob_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Credential, EncodeError, Endpoint, Error, HttpClient, Method, Request,
    RequestBuilder, Response, Result, WireForm, decode_into, encode, from_json,
};
