//! Dual-surface authenticated HTTP client for the VictorOps API.
//!
//! `VoClient` wraps a single `reqwest::Client` and the credential set
//! for both API surfaces:
//!
//! - The **public** API (`api.victorops.com/api-public`), authenticated
//!   with the `X-VO-Api-Id` / `X-VO-Api-Key` identity headers.
//! - The **private** portal API (`portal.victorops.com/api`),
//!   authenticated with HTTP Basic from the account username/password.
//!
//! Both surfaces share one request path parameterized by [`Surface`]
//! rather than two near-identical builders. Credentials are immutable
//! after construction and no interior state exists, so a `VoClient`
//! can be shared freely across tasks by reference.
//!
//! Failure normalization:
//! - A malformed URL fails immediately with
//!   `VoError::RequestConstruction`.
//! - A transport failure (DNS, TCP, TLS) surfaces as `VoError::Network`
//!   without touching any response.
//! - A non-200 status reads the full body and fails with `VoError::Api`
//!   carrying the exact status code and raw body text.
//! - On 200 the body is read to completion on every path, so the
//!   connection is always released; JSON decode failures surface as
//!   `VoError::Parse`.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, VoError};

const PUBLIC_API_URL: &str = "https://api.victorops.com/api-public";
const PRIVATE_API_URL: &str = "https://portal.victorops.com/api";

/// Organization slug used by the upstream deployment. Overridable via
/// [`VoClient::with_org`].
const DEFAULT_ORG: &str = "netconomy";

/// Selects which API surface a request targets, which in turn decides
/// the base URL and the credential scheme attached to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Surface {
    /// Versioned public API; identity headers.
    Public,
    /// Internal portal API; HTTP Basic auth.
    Private,
}

/// Authenticated client for the VictorOps REST APIs.
///
/// Built from four strings (account username, API id, API key, account
/// password); the operation functions in [`crate::incidents`] and
/// [`crate::oncall`] are its only public surface beyond construction.
pub struct VoClient {
    http: Client,
    public_base: String,
    private_base: String,
    pub(crate) org: String,
    pub(crate) user: String,
    api_id: String,
    api_key: String,
    password: String,
}

impl VoClient {
    /// Creates a client for the given account username, API id/key pair
    /// and account password, targeting the production base URLs.
    pub fn new(user: &str, api_id: &str, api_key: &str, password: &str) -> Self {
        VoClient {
            http: Client::new(),
            public_base: PUBLIC_API_URL.to_string(),
            private_base: PRIVATE_API_URL.to_string(),
            org: DEFAULT_ORG.to_string(),
            user: user.to_string(),
            api_id: api_id.to_string(),
            api_key: api_key.to_string(),
            password: password.to_string(),
        }
    }

    /// Sets the organization slug interpolated into portal override
    /// paths (`v2/org/{org}/overrides`).
    pub fn with_org(mut self, org: &str) -> Self {
        self.org = org.to_string();
        self
    }

    /// Overrides both base URLs, used by tests to point at a local mock
    /// server and by multi-tenant deployments with non-default hosts.
    pub fn with_base_urls(mut self, public_base: &str, private_base: &str) -> Self {
        self.public_base = public_base.to_string();
        self.private_base = private_base.to_string();
        self
    }

    /// The account username attached to request bodies that require an
    /// acting user (`userName` fields).
    pub fn username(&self) -> &str {
        &self.user
    }

    fn base(&self, surface: Surface) -> &str {
        match surface {
            Surface::Public => &self.public_base,
            Surface::Private => &self.private_base,
        }
    }

    /// Constructs a request builder for the given surface with the
    /// matching credentials and JSON content headers attached.
    ///
    /// Factored out of [`request`](Self::request) so construction
    /// failures (malformed URLs) are classified before anything is
    /// sent.
    fn build_request<B: Serialize + ?Sized>(
        &self,
        surface: Surface,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::RequestBuilder> {
        let url = format!("{}/{}", self.base(surface), path)
            .parse::<reqwest::Url>()
            .map_err(|e| VoError::RequestConstruction(e.to_string()))?;

        let mut req = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        req = match surface {
            Surface::Public => req
                .header("X-VO-Api-Id", &self.api_id)
                .header("X-VO-Api-Key", &self.api_key),
            Surface::Private => req.basic_auth(&self.user, Some(&self.password)),
        };

        if let Some(payload) = body {
            req = req.json(payload);
        }
        Ok(req)
    }

    /// Core send path: submits the request and normalizes non-200
    /// statuses into `VoError::Api` with the full body text. Returns
    /// the open response on 200; callers must consume the body.
    pub(crate) async fn request<B: Serialize + ?Sized>(
        &self,
        surface: Surface,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let req = self.build_request(surface, method.clone(), path, body)?;
        tracing::debug!(%method, path, surface = ?surface, "sending request");

        let resp = req.send().await?;

        if resp.status() != StatusCode::OK {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(VoError::Api { status, body });
        }
        Ok(resp)
    }

    /// Sends a request and deserializes the JSON response body.
    ///
    /// The body is read as text first so it is fully consumed even when
    /// decoding fails, and so the raw payload can be traced.
    pub(crate) async fn request_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        surface: Surface,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let text = self.request(surface, method, path, body).await?.text().await?;
        tracing::trace!(path, body = %text, "response payload");
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends a request and returns the raw response text, for endpoints
    /// whose response schema is not modeled.
    pub(crate) async fn request_text<B: Serialize + ?Sized>(
        &self,
        surface: Surface,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        Ok(self.request(surface, method, path, body).await?.text().await?)
    }
}
