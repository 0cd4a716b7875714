//! Address verification demo.
//!
//! Verifies one US address against the lob.com API:
//!
//! ```text
//! LOB_API_KEY=test_... cargo run -p verify-address-demo -- "185 Berry St" "San Francisco" CA 94107
//! ```
//!
//! Set `RUST_LOG=lob=debug` to see each request.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::collections::HashMap;

use derive_more::{Display, Error, From};
use lob::prelude::*;
use tracing::{info, warn};

// ============================================================================
// Data Types
// ============================================================================

/// Fields accepted by the `verify` endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyAddress {
    pub address_line1: String,
    pub address_line2: String,
    pub address_city: String,
    pub address_state: String,
    pub address_zip: String,
    pub address_country: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// Normalized address returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifiedAddress {
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub address_city: String,
    #[serde(default)]
    pub address_state: String,
    #[serde(default)]
    pub address_zip: String,
}

/// Verification result, or the error payload when the API rejects the input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Verification {
    pub address: Option<VerifiedAddress>,
    pub message: Option<String>,
    pub error: Option<ApiError>,
}

/// Error payload of a rejected call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub status_code: Option<u16>,
}

// ============================================================================
// Verification
// ============================================================================

/// Why [`verify`] failed.
#[derive(Debug, Display, Error, From)]
pub enum VerifyError {
    /// The request record holds a field type the wire format cannot express.
    #[display("invalid verify request: {_0}")]
    Encode(EncodeError),

    /// The API call failed.
    #[display("verify call failed: {_0}")]
    Api(Error),
}

/// Verify `address` and return the API's answer.
///
/// On a rejected address the error payload is in
/// [`Verification::error`] as well as in the returned error.
pub async fn verify<C: HttpClient, A: Serialize + ?Sized>(
    lob: &Lob<C>,
    address: &A,
    verification: &mut Verification,
) -> std::result::Result<(), VerifyError> {
    let params = encode(address)?;
    lob.post("verify", Some(&params), verification).await?;
    Ok(())
}

fn address_from_args(args: &[String]) -> Option<VerifyAddress> {
    let [line1, city, state, zip] = args else {
        return None;
    };
    Some(VerifyAddress {
        address_line1: line1.clone(),
        address_city: city.clone(),
        address_state: state.clone(),
        address_zip: zip.clone(),
        metadata: HashMap::from([("source".to_string(), "verify-address-demo".to_string())]),
        ..VerifyAddress::default()
    })
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verify_address_demo=info,lob=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key = std::env::var("LOB_API_KEY").map_err(|_| "LOB_API_KEY is not set")?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let address = address_from_args(&args).ok_or("usage: verify-address <line1> <city> <state> <zip>")?;

    let client = HyperClient::builder().with_defaults().build();
    let lob = Lob::builder(api_key).client(client).build()?;

    let mut verification = Verification::default();
    match verify(&lob, &address, &mut verification).await {
        Ok(()) => {
            let verified = verification.address.unwrap_or_default();
            info!(zip = %verified.address_zip, "address verified");
            println!(
                "{}, {}, {} {}",
                verified.address_line1,
                verified.address_city,
                verified.address_state,
                verified.address_zip
            );
            if let Some(message) = verification.message {
                println!("note: {message}");
            }
        }
        Err(VerifyError::Api(err)) if err.is_client_error() => {
            let message = verification
                .error
                .map_or_else(|| err.to_string(), |e| e.message);
            warn!(status = err.status(), "address rejected");
            println!("rejected: {message}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
