//! Main RollcallClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::ApiError;

/// The client for the attendance backend.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks.
///
/// # Example
///
/// ```ignore
/// use rollcall_api::RollcallClient;
///
/// let client = RollcallClient::builder()
///     .url("http://127.0.0.1:5000")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let periods = client.teacher_periods_today().await?;
/// ```
#[derive(Clone)]
pub struct RollcallClient {
    inner: Arc<RollcallClientInner>,
}

struct RollcallClientInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
    session_cookie: Option<String>,
}

impl std::fmt::Debug for RollcallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollcallClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl RollcallClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> RollcallClientBuilder<Missing> {
        RollcallClientBuilder::new()
    }

    /// Returns the backend base URL.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Returns the per-request timeout, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    /// Absolute URL for a backend path such as `/api/periods/3/status`.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.inner.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    // -------------------------------------------------------------------------
    // Request plumbing
    // -------------------------------------------------------------------------

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        log::debug!("{method} {url}");

        let mut request = self.inner.http_client.request(method, url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        if let Some(cookie) = &self.inner.session_cookie {
            request = request.header(COOKIE, format!("session={cookie}"));
        }
        Ok(request)
    }

    /// Send a request, turning non-success statuses into [`ApiError::Http`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.inner.timeout.unwrap_or_default())
            } else {
                ApiError::Network(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &body))
    }

    /// Read a JSON body. Missing fields fall back to their defaults in the
    /// model types; anything that is not JSON at all is a parse error.
    pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Self::read_json(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path)?.json(body)).await?;
        Self::read_json(response).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::POST, path)?).await?;
        Self::read_json(response).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::DELETE, path)?).await?;
        Self::read_json(response).await
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`RollcallClient`].
///
/// The backend URL is required and enforced at compile time.
pub struct RollcallClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    session_cookie: Option<String>,
    http_client: Option<Client>,
}

impl RollcallClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            session_cookie: None,
            http_client: None,
        }
    }

    /// Sets the backend base URL, e.g. `http://127.0.0.1:5000`.
    pub fn url(self, url: impl Into<String>) -> RollcallClientBuilder<Set<String>> {
        RollcallClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            session_cookie: self.session_cookie,
            http_client: self.http_client,
        }
    }
}

impl Default for RollcallClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> RollcallClientBuilder<U> {
    /// Sets the request timeout. Requests never time out when unset.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sends `session=<cookie>` with every request.
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl RollcallClientBuilder<Set<String>> {
    /// Builds the [`RollcallClient`].
    ///
    /// Fails when the URL does not parse or the HTTP client cannot be built.
    pub fn build(self) -> Result<RollcallClient, ApiError> {
        let base_url = Url::parse(&self.url.0).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.url.0)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.url.0));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(RollcallClient {
            inner: Arc::new(RollcallClientInner {
                base_url,
                http_client,
                timeout: self.timeout,
                session_cookie: self.session_cookie,
            }),
        })
    }
}
