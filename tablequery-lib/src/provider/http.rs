//! HTTP data provider

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::ApiError;
use crate::query::QueryRequest;

use super::DataProvider;
use super::ProviderResponse;

/// How a [`QueryRequest`] is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStyle {
    /// `POST` the full request as a JSON body.
    #[default]
    Body,
    /// `GET` with `page` and `pageSize` query parameters.
    QueryString,
    /// `GET` the endpoint as-is; the endpoint returns every record.
    Unpaginated,
}

impl RequestStyle {
    /// Parses `body` / `query` / `unpaginated`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "body" => Some(Self::Body),
            "query" | "query-string" => Some(Self::QueryString),
            "unpaginated" | "all" => Some(Self::Unpaginated),
            _ => None,
        }
    }
}

/// A [`DataProvider`] backed by an HTTP endpoint.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use tablequery_lib::provider::{HttpProvider, RequestStyle};
///
/// let provider = HttpProvider::builder()
///     .url("https://localhost:7270/api/Student/GetAll")
///     .style(RequestStyle::QueryString)
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpProvider {
    inner: Arc<HttpProviderInner>,
}

struct HttpProviderInner {
    url: Url,
    style: RequestStyle,
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpProvider {
    /// Creates a new builder for constructing a provider.
    pub fn builder() -> HttpProviderBuilder<Missing> {
        HttpProviderBuilder::new()
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        self.inner.url.as_str()
    }

    /// Returns the request style.
    pub fn style(&self) -> RequestStyle {
        self.inner.style
    }

    fn request_builder(&self, request: &QueryRequest) -> reqwest::RequestBuilder {
        let client = &self.inner.http_client;
        let builder = match self.inner.style {
            RequestStyle::Body => client.post(self.inner.url.clone()).json(request),
            RequestStyle::QueryString => {
                let mut url = self.inner.url.clone();
                url.query_pairs_mut().extend_pairs(request.query_pairs());
                client.get(url)
            }
            RequestStyle::Unpaginated => client.get(self.inner.url.clone()),
        };

        match self.inner.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("url", &self.inner.url.as_str())
            .field("style", &self.inner.style)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn fetch(&self, request: &QueryRequest) -> Result<ProviderResponse, ApiError> {
        let response = self
            .request_builder(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(ApiError::http(status.as_u16(), message));
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        ProviderResponse::parse(&body)
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpProvider`].
///
/// The endpoint URL is required and enforced at compile time.
pub struct HttpProviderBuilder<U> {
    url: U,
    style: RequestStyle,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpProviderBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            style: RequestStyle::default(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the endpoint URL.
    pub fn url(self, url: impl Into<String>) -> HttpProviderBuilder<Set<String>> {
        HttpProviderBuilder {
            url: Set(url.into()),
            style: self.style,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for HttpProviderBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpProviderBuilder<U> {
    /// Sets the request style. Defaults to [`RequestStyle::Body`].
    pub fn style(mut self, style: RequestStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the per-request timeout.
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

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl HttpProviderBuilder<Set<String>> {
    /// Builds the [`HttpProvider`].
    ///
    /// Fails with [`ApiError::InvalidUrl`] if the URL does not parse.
    pub fn build(self) -> Result<HttpProvider, ApiError> {
        let url = Url::parse(&self.url.0).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

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

        Ok(HttpProvider {
            inner: Arc::new(HttpProviderInner {
                url,
                style: self.style,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
