//! The lob.com verb client.
//!
//! [`Lob`] turns an endpoint, an optional [`WireForm`] and a destination
//! into one authenticated call:
//!
//! 1. the target URL is the base endpoint followed by the endpoint, plus the
//!    query string for GET;
//! 2. the whole body is read before the status is looked at;
//! 3. the body is decoded into the destination whatever the status;
//! 4. any status but 200 is returned as [`Error::Status`].
//!
//! Every failure is logged with a backtrace by the diagnostics module.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    ContentType, Credential, Endpoint, Error, HttpClient, HyperClient, Method, Request, Result,
    VERSION_HEADER, WireForm, decode_into, diagnostics, header,
};

/// Client for the lob.com API.
///
/// Cloning is cheap when the transport is: [`HyperClient`] shares its
/// connection pool between clones.
///
/// # Example
///
/// ```no_run
/// use lob::{Lob, encode};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct VerifyRequest {
///     address_line1: String,
///     address_city: String,
///     address_state: String,
///     address_zip: String,
/// }
///
/// #[derive(Debug, Default, Deserialize)]
/// struct Verification {
///     message: Option<String>,
/// }
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let lob = Lob::new("test_key");
/// let params = encode(&VerifyRequest {
///     address_line1: "185 Berry St".to_string(),
///     address_city: "San Francisco".to_string(),
///     address_state: "CA".to_string(),
///     address_zip: "94107".to_string(),
/// })?;
///
/// let mut verification = Verification::default();
/// lob.post("verify", Some(&params), &mut verification).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Lob<C = HyperClient> {
    client: C,
    credential: Credential,
}

impl<C> std::fmt::Debug for Lob<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lob")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl Lob<HyperClient> {
    /// Client for the production endpoint, with a default [`HyperClient`].
    #[must_use]
    pub fn new(api_key: impl AsRef<str>) -> Self {
        Self::with_client(HyperClient::new(), Credential::new(api_key))
    }

    /// Start configuring a client.
    #[must_use]
    pub fn builder(api_key: impl AsRef<str>) -> LobBuilder<HyperClient> {
        LobBuilder {
            client: None,
            credential: Credential::new(api_key),
        }
    }
}

impl<C: HttpClient> Lob<C> {
    /// Client over any transport.
    ///
    /// The credential's base URL is used as-is.
    #[must_use]
    pub const fn with_client(client: C, credential: Credential) -> Self {
        Self { client, credential }
    }

    /// The credential the client authenticates with.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The underlying transport.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.client
    }

    /// `GET <base><endpoint>?<params>`.
    ///
    /// An absent or empty form sends no query string at all.
    ///
    /// A successful decode replaces `*dest` as a whole: fields missing from
    /// the response are reset to their `Deserialize` defaults, not kept.
    ///
    /// # Errors
    ///
    /// See [`Self::post`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&WireForm>,
        dest: &mut T,
    ) -> Result<()> {
        let query = params.map(WireForm::to_query_string).unwrap_or_default();
        let url = format!("{}{query}", self.credential.url_for(endpoint));
        self.call(Method::Get, endpoint, url, None, dest).await
    }

    /// `POST <base><endpoint>` with `params` as a form body.
    ///
    /// An absent or empty form sends neither a body nor a `Content-Type`.
    ///
    /// A successful decode replaces `*dest` as a whole: fields missing from
    /// the response are reset to their `Deserialize` defaults, not kept.
    ///
    /// # Errors
    ///
    /// - [`Error::RequestConstruction`] if the URL or a header is invalid
    /// - [`Error::Network`] if the API cannot be reached
    /// - [`Error::BodyRead`] if the response body cannot be read
    /// - [`Error::Status`] if the status is not 200; `dest` has still been
    ///   decoded from the body when it was valid JSON
    /// - [`Error::Decode`] if the status is 200 but the body does not fit `T`
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&WireForm>,
        dest: &mut T,
    ) -> Result<()> {
        let url = self.credential.url_for(endpoint);
        self.call(Method::Post, endpoint, url, params, dest).await
    }

    /// `DELETE <base><endpoint>`, without body or parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::post`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, dest: &mut T) -> Result<()> {
        let url = self.credential.url_for(endpoint);
        self.call(Method::Delete, endpoint, url, None, dest).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        url: String,
        form: Option<&WireForm>,
        dest: &mut T,
    ) -> Result<()> {
        debug!("Lob {method} {url}");

        let request = self
            .build_request(method, endpoint, &url, form)
            .map_err(|e| diagnostics::report(e, method, &url))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| diagnostics::report(e, method, &url))?;

        // Error payloads are decoded too; the outcome only matters on 200.
        let decoded = decode_into(response.body(), dest);

        if !response.is_success() {
            let err = Error::status_error(response.status(), url.as_str(), response.body());
            return Err(diagnostics::report(err, method, &url));
        }

        decoded.map_err(|e| diagnostics::report(e, method, &url))
    }

    fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        url: &str,
        form: Option<&WireForm>,
    ) -> Result<Request<Bytes>> {
        let url = parse_http_url(url)?;

        let mut builder = Request::builder(method, url)
            .header(header::AUTHORIZATION.as_str(), self.credential.authorization())
            .header(VERSION_HEADER, self.credential.api_version())
            .header(header::ACCEPT.as_str(), ContentType::Json.as_str())
            .extension(Endpoint::new(endpoint));

        if let Some(form) = form {
            builder = builder.form(form);
        }

        Ok(builder.build())
    }
}

/// Parse a target URL. Only `http` and `https` can be sent.
fn parse_http_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url)
        .map_err(|e| Error::request_construction(format!("invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::request_construction(format!(
            "unsupported scheme {scheme} in {url}"
        ))),
    }
}

/// Builder for [`Lob`].
///
/// # Example
///
/// ```no_run
/// use lob::{HyperClient, Lob};
///
/// let lob = Lob::builder("test_key")
///     .base_url("http://localhost:8080/v1/")
///     .client(HyperClient::builder().with_logging().build())
///     .build()
///     .expect("valid base URL");
/// ```
#[derive(Debug)]
pub struct LobBuilder<C = HyperClient> {
    client: Option<C>,
    credential: Credential,
}

impl<C> LobBuilder<C> {
    /// Target another base endpoint. Defaults to [`crate::BASE_API`].
    #[must_use]
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.credential = self.credential.with_base_url(base_url);
        self
    }

    /// Send another protocol version. Defaults to [`crate::API_VERSION`].
    #[must_use]
    pub fn api_version(mut self, api_version: impl AsRef<str>) -> Self {
        self.credential = self.credential.with_api_version(api_version);
        self
    }

    /// Use a custom transport.
    #[must_use]
    pub fn client<C2: HttpClient>(self, client: C2) -> LobBuilder<C2> {
        LobBuilder {
            client: Some(client),
            credential: self.credential,
        }
    }
}

impl<C: HttpClient + Default> LobBuilder<C> {
    /// Build the client, creating a default transport if none was set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestConstruction`] if the base URL is not a valid
    /// absolute `http` or `https` URL.
    pub fn build(self) -> Result<Lob<C>> {
        parse_http_url(self.credential.base_url())?;

        Ok(Lob::with_client(
            self.client.unwrap_or_default(),
            self.credential,
        ))
    }
}
