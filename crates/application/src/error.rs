//! Client error taxonomy.

use ladle_domain::DomainError;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the API client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received. Never triggers a token refresh.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A 2xx body did not match any accepted shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Client-side validation failed before any network call.
    #[error(transparent)]
    Validation(#[from] DomainError),
}

impl ApiError {
    /// Whether this is a 401 response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    /// Human-readable message for the store error channel.
    ///
    /// Prefers the server's `message` field when the body is JSON,
    /// falling back to the stringified error.
    #[must_use]
    pub fn server_message(&self) -> String {
        if let Self::Http { body, .. } = self
            && let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
            && let Some(message) = parsed.message
        {
            return message;
        }
        self.to_string()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;
