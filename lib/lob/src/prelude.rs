//! Prelude module for convenient imports.
//!
//! ```ignore
//! use lob::prelude::*;
//! ```

pub use crate::{
    ClientConfig, Credential, EncodeError, Error, HttpClient, HyperClient, Lob, Result, WireForm,
    encode,
};
pub use serde::{Deserialize, Serialize};
