//! API client: bearer attachment and the 401→refresh→retry protocol.
//!
//! Every request runs attach→send→(maybe refresh)→retry in order. A 401
//! on a request that has not been retried and is not the refresh
//! endpoint itself triggers the refresh protocol through the coalescing
//! gate; on success the request is resubmitted exactly once with the new
//! token. Network errors (no response) propagate immediately.

mod gate;

pub use gate::RefreshGate;

use ladle_domain::{ClientConfig, TokenGrant};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::ports::{ApiRequest, HttpTransport, RawResponse};
use crate::session::SessionStore;

/// Path of the refresh endpoint; 401s here never recurse into another
/// refresh attempt.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// HTTP client wrapper around a transport, a session, and a refresh gate.
#[derive(Debug)]
pub struct ApiClient<T> {
    transport: T,
    session: SessionStore,
    config: ClientConfig,
    gate: RefreshGate,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Creates a client over the given transport and session.
    #[must_use]
    pub fn new(transport: T, session: SessionStore, config: ClientConfig) -> Self {
        Self {
            transport,
            session,
            config,
            gate: RefreshGate::new(),
        }
    }

    /// The session context this client mutates.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The configured policy.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a request, refreshing and retrying once on a 401.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when no response was received and
    /// [`ApiError::Http`] for non-2xx responses, after at most one
    /// refresh-and-retry attempt.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse> {
        let mut retried = false;
        loop {
            let response = self.dispatch(request.clone()).await?;
            if response.is_success() {
                return Ok(response);
            }

            let error = ApiError::Http {
                status: response.status,
                body: response.text(),
            };

            if response.status == 401
                && !retried
                && !Self::is_refresh_request(&request)
                && self.refresh_session().await
            {
                retried = true;
                continue;
            }

            return Err(error);
        }
    }

    /// Sends a request and decodes a 2xx body as JSON.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus [`ApiError::Decode`] when the body
    /// does not match `R`.
    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let response = self.send(request).await?;
        response
            .json()
            .map_err(|error| ApiError::Decode(error.to_string()))
    }

    /// Runs the refresh protocol, coalescing concurrent callers onto a
    /// single underlying attempt. Returns true when new tokens were
    /// stored.
    pub async fn refresh_session(&self) -> bool {
        self.gate.run(|| self.perform_refresh()).await
    }

    /// Attaches the bearer token and hands the request to the transport.
    /// No status interpretation happens here.
    async fn dispatch(&self, mut request: ApiRequest) -> ApiResult<RawResponse> {
        let token = self.session.access_token().await;
        if !token.is_empty() {
            request = request.with_header("Authorization", format!("Bearer {token}"));
        }
        tracing::debug!(id = %request.id, method = %request.method, path = %request.path, "dispatch");
        self.transport
            .send(request)
            .await
            .map_err(|error| ApiError::Network(error.to_string()))
    }

    fn is_refresh_request(request: &ApiRequest) -> bool {
        request.path.contains(REFRESH_PATH)
    }

    /// Two-attempt refresh: cookie path first, then the stored refresh
    /// token in the body, as permitted by the configured strategy. Both
    /// attempts failing escalates to a full logout.
    async fn perform_refresh(&self) -> bool {
        let strategy = self.config.refresh_strategy;
        tracing::debug!(?strategy, "refreshing access token");

        if strategy.tries_cookie() {
            match self.request_refresh(None).await {
                Ok(grant) => {
                    self.session.set_tokens(&grant.token_pair()).await;
                    return true;
                }
                Err(error) if strategy.tries_body() => {
                    tracing::debug!(%error, "cookie refresh failed, trying body path");
                }
                Err(error) => {
                    tracing::warn!(%error, "refresh failed, logging out");
                    self.session.logout().await;
                    return false;
                }
            }
        }

        if strategy.tries_body() {
            if let Some(refresh_token) = self.session.refresh_token().await {
                match self.request_refresh(Some(refresh_token)).await {
                    Ok(grant) => {
                        self.session.set_tokens(&grant.token_pair()).await;
                        return true;
                    }
                    Err(error) => tracing::warn!(%error, "body refresh failed"),
                }
            } else {
                tracing::debug!("no stored refresh token for body attempt");
            }
        }

        tracing::warn!("refresh failed, logging out");
        self.session.logout().await;
        false
    }

    async fn request_refresh(&self, refresh_token: Option<String>) -> ApiResult<TokenGrant> {
        let mut request = ApiRequest::post(REFRESH_PATH);
        if let Some(token) = refresh_token {
            request = request.with_body(&serde_json::json!({ "refreshToken": token }));
        }

        // Through dispatch, not send: the refresh endpoint must never
        // re-enter the retry protocol.
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.text(),
            });
        }
        response
            .json()
            .map_err(|error| ApiError::Decode(error.to_string()))
    }
}
