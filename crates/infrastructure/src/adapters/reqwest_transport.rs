//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. The cookie store is
//! enabled so the cookie-path refresh credential survives between
//! requests; statuses are not interpreted here.

use std::time::Duration;

use async_trait::async_trait;
use ladle_application::{ApiRequest, HttpTransport, RawResponse, TransportError};
use ladle_domain::{ClientConfig, HttpMethod};
use reqwest::{Client, Method, Url};

/// Transport adapter over `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a transport for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the underlying client cannot be
    /// built.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|error| TransportError::Network(error.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Creates a transport over a pre-built client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn build_url(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self
            .base_url
            .join(&request.path)
            .map_err(|error| TransportError::InvalidUrl(format!("{error}: {}", request.path)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
        }
        Ok(url)
    }

    fn map_error(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Network(format!("timeout: {error}"));
        }
        if error.is_connect() {
            return TransportError::Network(format!("connection failed: {error}"));
        }
        TransportError::Network(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let url = self.build_url(&request)?;
        tracing::trace!(id = %request.id, method = %request.method, url = %url, "sending");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| Self::map_error(&error))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| TransportError::Network(format!("failed to read body: {error}")))?
            .to_vec();

        Ok(RawResponse::new(status, body))
    }
}
